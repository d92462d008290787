#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    intern_offer_server::run().await
}
