use anyhow::Context;
use log::info;
use outcome::{guard, guard_iter, Outcome};

/// Parses a port value out of a raw config entry.
fn parse_port(raw: &str) -> anyhow::Result<u16> {
    raw.trim()
        .parse()
        .with_context(|| format!("invalid port entry: {:?}", raw))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // a single guarded parse, recovered to a default on failure
    let port = guard(|| parse_port("8080"))
        .inspect_failure(|e| info!("falling back to default port: {:#}", e))
        .value_or(80);
    info!("configured port: {}", port);

    // same chain against a broken entry
    let port = guard(|| parse_port("eight thousand"))
        .inspect_failure(|e| info!("falling back to default port: {:#}", e))
        .value_or(80);
    info!("configured port: {}", port);

    // a lazy sequence of parses, cut off at the first broken entry
    let entries = ["80", "443", "not-a-port", "8080"];
    let parsed: Vec<Outcome<u16, _>> =
        guard_iter(|| entries.iter().map(|raw| parse_port(raw))).collect();

    for outcome in &parsed {
        match outcome {
            Outcome::Success(port) => info!("accepted port {}", port),
            Outcome::Failure(e) => info!("rejected entry: {:#}", e),
        }
    }

    // the sequence closed on the fault, the trailing entry was never parsed
    assert_eq!(parsed.len(), 3);

    // errors can be narrowed to a domain payload up front
    let labelled = guard(|| parse_port("70000"))
        .map(|port| format!("port {}", port))
        .recover(|e| format!("unusable ({})", e));
    info!("entry resolved to: {:?}", labelled.value());

    Ok(())
}
