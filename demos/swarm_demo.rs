// Demonstration: train the shared swarm policy over a few episodes.
//
// Run from the repo root:
//   RUST_LOG=info cargo run --example swarm_demo -- --grid 30 --agents 8 --ticks 100 --episodes 5 --policy swarm_policy.json

#[cfg(feature = "serde")]
fn main() {
    use std::env;

    use prospector::rl::{load_policy, save_policy, SwarmConfig, SwarmEnvironment};
    use prospector::world::BlobGenerator;

    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let grid: usize = arg_value(&args, "--grid")
        .and_then(|s| s.parse().ok())
        .unwrap_or(50);
    let agents: usize = arg_value(&args, "--agents")
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);
    let ticks: u32 = arg_value(&args, "--ticks")
        .and_then(|s| s.parse().ok())
        .unwrap_or(50);
    let episodes: u64 = arg_value(&args, "--episodes")
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let fill: f64 = arg_value(&args, "--fill")
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.1);
    let blobs: usize = arg_value(&args, "--blobs")
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);
    let policy_path = arg_value(&args, "--policy").unwrap_or("q_table.json");

    let config = SwarmConfig {
        num_agents: agents,
        num_ticks: ticks,
        ..SwarmConfig::square(grid)
    };
    let generator = BlobGenerator::new(fill, blobs);

    let mut policy = match load_policy(policy_path) {
        Ok(policy) => policy,
        Err(e) => {
            eprintln!("Cannot load policy from '{}': {}", policy_path, e);
            std::process::exit(1);
        }
    };

    for episode in 0..episodes {
        let mut env = match SwarmEnvironment::generate(config.clone(), &generator, seed + episode) {
            Ok(env) => env,
            Err(e) => {
                eprintln!("Invalid configuration: {}", e);
                std::process::exit(2);
            }
        };
        let summary = env.run(&mut policy);
        println!("Episode {}/{}", episode + 1, episodes);
        println!("{}", summary);

        if episode + 1 == episodes {
            if let Some(last) = env.history().last() {
                print!("{}", last.frame(env.world()));
            }
        }
    }

    if let Err(e) = save_policy(policy_path, &policy) {
        eprintln!("Cannot save policy to '{}': {}", policy_path, e);
        std::process::exit(1);
    }
    println!("Policy: {} observations stored in {}", policy.len(), policy_path);
}

#[cfg(not(feature = "serde"))]
fn main() {
    eprintln!(
        "This example requires the 'serde' feature.\n\
Run:\n\
  cargo run --example swarm_demo --features serde -- --episodes 5"
    );
}

#[cfg(feature = "serde")]
fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
