/*
 * Responsibility
 * - tokio runtime entry
 * - app::run() の呼び出し (ロジックは置かない)
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    users_api::app::run().await
}
