use stress_test::{stress_test_scaling, stress_test_store};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("failed to start runtime: {}", err);
            std::process::exit(1);
        }
    };
    let consistent = rt.block_on(async_main());
    if !consistent {
        std::process::exit(1);
    }
}

async fn async_main() -> bool {
    println!("Started at {}", chrono::Utc::now().to_rfc3339());

    println!("\n\n╔════════════════════════════════════════════════════════════╗");
    println!("║            ASYNC STRESS TESTS                               ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    let mut consistent = true;

    // Test 1: one hot document, every writer contends
    let stats = stress_test_store("hot document", 1, 4, 200, 2, 200).await;
    stats.print();
    consistent &= stats.consistent;

    // Test 2: small corpus
    let stats = stress_test_store("small corpus", 10, 4, 500, 4, 500).await;
    stats.print();
    consistent &= stats.consistent;

    // Test 3: larger corpus, read heavy
    let stats = stress_test_store("read heavy", 100, 8, 500, 16, 1000).await;
    stats.print();
    consistent &= stats.consistent;

    // Test 4: contention vs spread
    println!("\n\n╔════════════════════════════════════════════════════════════╗");
    println!("║          SCALING ANALYSIS (writers over documents)         ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    stress_test_scaling(21, 5).await;

    if consistent {
        println!("\n✓ All stress tests completed successfully!");
    } else {
        println!("\n✗ Index and content diverged");
    }
    consistent
}
