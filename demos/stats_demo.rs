use std::hash::RandomState;

use chain_hash::HashMap;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "count", default_value_t = 1000)]
    count: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut map: HashMap<u64, u64, RandomState> = HashMap::new();
    println!(
        "Starting with {} buckets, filling with {} keys...",
        map.capacity(),
        args.count
    );

    let mut capacity = map.capacity();
    for key in 0..args.count {
        map.insert(key, key * key);
        if map.capacity() != capacity {
            println!(
                "  grew {} -> {} buckets at len {} ({:.2}% load)",
                capacity,
                map.capacity(),
                map.len(),
                map.load_factor() * 100.0
            );
            capacity = map.capacity();
        }
    }

    println!(
        "Inserted {} keys, final load factor: {:.2}%",
        map.len(),
        map.load_factor() * 100.0
    );
    map.chain_histogram().print();
    map.debug_stats().print();

    println!("Erasing every key...");
    for key in 0..args.count {
        map.erase(&key);
        if map.capacity() != capacity {
            println!(
                "  shrank {} -> {} buckets at len {} ({:.2}% load)",
                capacity,
                map.capacity(),
                map.len(),
                map.load_factor() * 100.0
            );
            capacity = map.capacity();
        }
    }

    map.debug_stats().print();
}
