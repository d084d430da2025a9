#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pdf_fortress_lib::run().await
}
