/*!
 * Region Arena - Workload Driver
 *
 * Runs concurrent allocation bursts against an arena built from the
 * ARENA_* environment and prints the final statistics as JSON.
 *
 * Usage: arena [threads] [operations-per-thread]
 */

use anyhow::Context;
use region_arena::monitoring::span_workload;
use region_arena::{init_tracing, Arena, ArenaConfig};
use std::ptr::NonNull;
use std::sync::Arc;
use std::thread;
use tracing::info;

#[cfg(all(feature = "jemalloc", not(target_env = "msvc")))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const DEFAULT_THREADS: usize = 4;
const DEFAULT_OPERATIONS: usize = 10_000;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let threads = parse_arg(args.next(), DEFAULT_THREADS).context("invalid thread count")?;
    let operations = parse_arg(args.next(), DEFAULT_OPERATIONS).context("invalid operation count")?;

    let config = ArenaConfig::from_env()?;
    info!(?config, threads, operations, "Starting arena workload");
    let arena = Arc::new(Arena::with_config(config)?);

    let handles: Vec<_> = (0..threads)
        .map(|worker| {
            let arena = Arc::clone(&arena);
            thread::spawn(move || burst(&arena, worker, operations))
        })
        .collect();

    for handle in handles {
        handle
            .join()
            .map_err(|_| anyhow::anyhow!("worker thread panicked"))??;
    }

    let stats = arena.stats();
    info!(
        regions = stats.region_count,
        capacity = stats.total_capacity,
        used = stats.used_bytes,
        live = stats.live_allocations,
        "Workload finished"
    );
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn parse_arg(arg: Option<String>, default: usize) -> anyhow::Result<usize> {
    match arg {
        Some(raw) => Ok(raw.parse()?),
        None => Ok(default),
    }
}

/// Stack-like bursts with occasional growth, freed in reverse order
fn burst(arena: &Arena, worker: usize, operations: usize) -> anyhow::Result<()> {
    let mut span = span_workload(&format!("worker-{}", worker));
    let _entered = span.enter();

    let mut live: Vec<(NonNull<u8>, usize)> = Vec::with_capacity(64);
    for op in 0..operations {
        let size = 16 + (op * 7 + worker * 13) % 240;
        let hint = live.last().map(|&(ptr, _)| ptr);
        let ptr = arena.allocate(size, hint)?;
        // SAFETY: the grant is valid for `size` bytes
        unsafe { std::ptr::write_bytes(ptr.as_ptr(), worker as u8, size) };
        live.push((ptr, size));

        if op % 5 == 0 {
            if let Some((ptr, size)) = live.pop() {
                let grown = size * 2;
                if let Some(moved) = arena.reallocate(Some(ptr), size, grown, Some(ptr))? {
                    live.push((moved, grown));
                }
            }
        }

        if live.len() == 64 {
            while let Some((ptr, size)) = live.pop() {
                arena.deallocate(ptr, size);
            }
        }
    }
    while let Some((ptr, size)) = live.pop() {
        arena.deallocate(ptr, size);
    }

    drop(_entered);
    span.record_operations(operations);
    Ok(())
}
