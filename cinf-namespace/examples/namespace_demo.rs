//! Scan the host and show how its processes share namespaces
//!
//! Run with: cargo run --example namespace_demo
//! Run as root to see every process: sudo cargo run --example namespace_demo

use cinf_core::{HostPaths, NamespaceKind, ProcessId};
use cinf_namespace::{gather, resolve};

fn main() {
    println!("Namespace correlation demo\n");

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let paths = HostPaths::new();
    demo_own_namespaces(&paths);

    match gather(&paths) {
        Ok(index) => {
            println!(
                "Scanned {} processes in {} namespaces\n",
                index.process_count(),
                index.namespace_count()
            );

            println!("{:<12} {:<5} {:>6}  {}", "NAMESPACE", "TYPE", "NPROCS", "USERS");
            println!("{:-<60}", "");
            for summary in index.summaries(40) {
                println!(
                    "{:<12} {:<5} {:>6}  {}",
                    summary.namespace.id,
                    summary.namespace.kind,
                    summary.processes,
                    summary.users_label()
                );
            }
        }
        Err(e) => println!("Scan failed: {e}"),
    }
}

fn demo_own_namespaces(paths: &HostPaths) {
    let pid = ProcessId::current();
    println!("Namespaces of this process ({pid}):");
    println!("{:-<60}", "");

    for kind in NamespaceKind::ALL {
        match resolve(paths, kind, pid) {
            Ok(namespace) => println!("  {namespace}"),
            Err(e) => println!("  {kind}: {e}"),
        }
    }
    println!();
}
