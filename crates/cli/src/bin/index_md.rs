use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    index_md_cli::main_entry().await
}
