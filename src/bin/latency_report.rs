use bitlob::{AddOrder, Command, Engine, Side};
use hdrhistogram::Histogram;
use std::time::Instant;

fn main() {
    println!("Preparing latency benchmark...");

    let mut engine = Engine::new(1_000_000);
    engine.warm_up();

    let mut histogram = Histogram::<u64>::new_with_bounds(1, 100_000, 3).unwrap();

    const ITERATIONS: u64 = 1_000_000;
    const BUFFER_SIZE: usize = 10_000;

    // Pre-generate commands so RNG and allocation stay out of the timed loop
    println!("Pre-generating {} commands...", BUFFER_SIZE);
    let mut commands = Vec::with_capacity(BUFFER_SIZE);
    for i in 0..BUFFER_SIZE {
        let order_id = (i + 1) as u64;
        commands.push(Command::Add(AddOrder {
            order_id,
            side: if i % 2 == 0 { Side::Buy } else { Side::Sell },
            price: 10_000 + (order_id % 100) as u32,
            quantity: 10,
        }));
    }

    // Train the branch predictor before measuring
    println!("Warming up branch predictor ({} ops)...", BUFFER_SIZE);
    for &cmd in commands.iter() {
        std::hint::black_box(engine.process_command(cmd));
    }

    println!("Running {} iterations...", ITERATIONS);

    let mut total_duration = std::time::Duration::new(0, 0);
    let mut command_cycle = commands.into_iter().cycle();

    for _ in 0..ITERATIONS {
        let cmd = command_cycle.next().unwrap();

        let start = Instant::now();
        std::hint::black_box(engine.process_command(cmd));
        let elapsed = start.elapsed();

        histogram.record(elapsed.as_nanos() as u64).unwrap_or(());
        total_duration += elapsed;
    }

    println!("\n=== Latency Report (ns) ===");
    println!("Total Ops:  {}", ITERATIONS);
    println!(
        "Throughput: {:.2} ops/sec",
        ITERATIONS as f64 / total_duration.as_secs_f64()
    );
    println!("---------------------------");
    println!("Min:    {:6} ns", histogram.min());
    println!("P50:    {:6} ns", histogram.value_at_quantile(0.50));
    println!("P90:    {:6} ns", histogram.value_at_quantile(0.90));
    println!("P99:    {:6} ns", histogram.value_at_quantile(0.99));
    println!("P99.9:  {:6} ns", histogram.value_at_quantile(0.999));
    println!("P99.99: {:6} ns", histogram.value_at_quantile(0.9999));
    println!("Max:    {:6} ns", histogram.max());
    println!("---------------------------");

    println!("\nDistribution:");
    for v in histogram.iter_log(100_000, 2.0) {
        let count = v.count_at_value();
        if count > 0 {
            println!("<= {:6} ns: {:10} count", v.value_iterated_to(), count);
        }
    }
}
