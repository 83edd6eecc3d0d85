#[tokio::main]
async fn main() {
    hostel_backend::run().await;
}
