//! `channel` command: resolve the input and print a statistics summary.

use ytlens_core::{format_count, ChannelStats};
use ytlens_youtube::YoutubeClient;

const DASH: &str = "\u{2014}";

/// Show statistics for the channel `input` refers to.
///
/// Views and video counts are always exact; subscribers are abbreviated
/// (`2.27M`) unless `exact` is set.
///
/// # Errors
///
/// Returns an error if the input cannot be resolved or the channel lookup
/// fails.
pub(crate) async fn run_channel(
    client: &YoutubeClient,
    input: &str,
    exact: bool,
) -> anyhow::Result<()> {
    let channel = client.resolve_channel(input).await?;
    let stats = client.get_channel(channel.id()).await?;
    for line in render_channel(&stats, exact) {
        println!("{line}");
    }
    Ok(())
}

fn render_channel(stats: &ChannelStats, exact: bool) -> Vec<String> {
    let subscribers = if stats.hidden_subscriber_count {
        "Hidden".to_string()
    } else {
        format_count(stats.subscriber_count, exact, 2)
    };
    let created = stats.published_at.map_or_else(
        || DASH.to_string(),
        |d| d.format("%Y-%m-%d").to_string(),
    );

    let mut lines = vec![
        stats.title.clone().unwrap_or_else(|| DASH.to_string()),
        format!("{:<14}{}", "Channel ID", stats.channel_id),
    ];
    if let Some(handle) = stats.handle() {
        lines.push(format!("{:<14}{handle}", "Custom URL"));
    }
    if let Some(country) = &stats.country {
        lines.push(format!("{:<14}{country}", "Country"));
    }
    lines.push(format!("{:<14}{created}", "Created"));
    lines.push(String::new());
    lines.push(format!("{:<14}{subscribers}", "Subscribers"));
    lines.push(format!(
        "{:<14}{}",
        "Total views",
        format_count(stats.view_count, true, 0)
    ));
    lines.push(format!(
        "{:<14}{}",
        "Videos",
        format_count(stats.video_count, true, 0)
    ));
    if let Some(description) = stats.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(String::new());
        lines.push(description.to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> ChannelStats {
        ChannelStats {
            channel_id: "UC_x5XG1OV2P6uZZ5FSM9Ttw".to_string(),
            title: Some("Google for Developers".to_string()),
            description: None,
            custom_url: Some("googledevelopers".to_string()),
            country: Some("US".to_string()),
            thumbnail_url: None,
            published_at: None,
            subscriber_count: Some(2_268_347),
            hidden_subscriber_count: false,
            view_count: Some(250_000_000),
            video_count: Some(6_000),
        }
    }

    fn line_for<'a>(lines: &'a [String], label: &str) -> &'a str {
        lines
            .iter()
            .find(|l| l.starts_with(label))
            .unwrap_or_else(|| panic!("no {label} line in {lines:?}"))
    }

    #[test]
    fn abbreviates_subscribers_and_keeps_views_exact() {
        let lines = render_channel(&stats(), false);
        assert_eq!(line_for(&lines, "Subscribers"), "Subscribers   2.27M");
        assert_eq!(line_for(&lines, "Total views"), "Total views   250,000,000");
        assert_eq!(line_for(&lines, "Custom URL"), "Custom URL    @googledevelopers");
    }

    #[test]
    fn exact_flag_prints_full_subscriber_count() {
        let lines = render_channel(&stats(), true);
        assert_eq!(line_for(&lines, "Subscribers"), "Subscribers   2,268,347");
    }

    #[test]
    fn hidden_subscribers_are_labelled() {
        let mut s = stats();
        s.hidden_subscriber_count = true;
        s.subscriber_count = None;
        let lines = render_channel(&s, false);
        assert_eq!(line_for(&lines, "Subscribers"), "Subscribers   Hidden");
    }

    #[test]
    fn missing_counts_render_as_dash() {
        let mut s = stats();
        s.video_count = None;
        let lines = render_channel(&s, false);
        assert_eq!(line_for(&lines, "Videos"), "Videos        \u{2014}");
    }
}
