use std::time::Instant;

use fetch_cache::{FetchClient, FetchOptions, Method};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let client = FetchClient::new();
    let options = FetchOptions::new().with_method(Method::Get);
    let target = "https://httpbin.org/json";

    println!("three concurrent fetches of {}...", target);
    let start = Instant::now();
    let (a, b, c) = futures::join!(
        client.fetch(target, &options),
        client.fetch(target, &options),
        client.fetch(target, &options),
    );
    println!("  took {:?}", start.elapsed());
    println!(
        "  statuses: {} / {} / {}",
        a?.status(),
        b?.status(),
        c?.status()
    );

    let stats = client.cache_stats();
    println!(
        "  cache: {} total, {} live, {} pending",
        stats.total_entries, stats.live_entries, stats.pending_entries
    );

    println!("one more fetch inside the TTL window...");
    let start = Instant::now();
    let cached = client.fetch(target, &options).await?;
    println!("  took {:?} (status {})", start.elapsed(), cached.status());

    println!("waiting out the TTL...");
    tokio::time::sleep(std::time::Duration::from_millis(5100)).await;
    let start = Instant::now();
    let fresh = client.fetch(target, &options).await?;
    println!("  took {:?} (status {})", start.elapsed(), fresh.status());

    Ok(())
}
