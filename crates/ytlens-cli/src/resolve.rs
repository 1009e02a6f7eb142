use ytlens_youtube::YoutubeClient;

/// Print the kind and canonical ID an input resolves to.
///
/// # Errors
///
/// Returns an error if the input is not recognised or a handle lookup fails.
pub(crate) async fn run_resolve(client: &YoutubeClient, input: &str) -> anyhow::Result<()> {
    let resolved = client.resolve(input).await?;
    println!("{:<9}{}", resolved.kind().to_string(), resolved.id());
    Ok(())
}
