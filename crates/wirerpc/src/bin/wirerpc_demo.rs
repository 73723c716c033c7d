//! Registers a small calculator, then calls it through the in-process transport.
//!
//! `RUST_LOG=wirerpc=trace` shows every dispatch step.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wirerpc::Client;
use wirerpc::ClientConfig;
use wirerpc::Exports;
use wirerpc::Server;
use wirerpc::ServerConfig;
use wirerpc::Service;
use wirerpc::export;
use wirerpc::transport;

#[derive(Default)]
struct Calculator {
    calls: AtomicU64,
}

impl Calculator {
    fn double(&self, x: i32) -> i32 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        x * 2
    }

    fn hypot(&self, a: f64, b: f64) -> f64 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        a.hypot(b)
    }

    fn mean(&self, values: Vec<f64>) -> Option<f64> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Service for Calculator {
    fn export(exports: &mut Exports<Self>) -> export::Result<()> {
        exports.export(Calculator::double)?;
        exports.export(Calculator::hypot)?;
        exports.export(Calculator::mean)?;
        exports.export(Calculator::calls)?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let server = Arc::new(Server::new(ServerConfig::from_env()));
    let calc = server.register(Calculator::default())?;
    for (id, signature) in calc.exports().iter() {
        info!(%id, %signature, "exported");
    }

    let client = Client::with_config(transport::local(Arc::clone(&server)), ClientConfig::from_env());

    let doubled = client.try_call(&calc, Calculator::double, (21,)).await?;
    info!(result = ?doubled.data(), "double(21)");

    let hypot = client.try_call(&calc, Calculator::hypot, (3.0, 4.0)).await?;
    info!(result = ?hypot.data(), "hypot(3, 4)");

    let mean = client.try_call(&calc, Calculator::mean, (vec![1.0, 2.0, 6.0],)).await?;
    info!(result = ?mean.data(), "mean([1, 2, 6])");

    let calls = client
        .call(&calc, Calculator::calls, ())
        .await
        .and_then(|slot| slot.into_inner())
        .context("calls() returned nothing")?;
    info!(calls, "done");

    Ok(())
}
