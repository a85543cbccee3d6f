#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    eduassist_server::run().await
}
