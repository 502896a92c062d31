use std::sync::OnceLock;

fn trace_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        std::env::var("WAVECARVE_TRACE")
            .ok()
            .map(|v| {
                let v = v.trim().to_ascii_lowercase();
                !(v.is_empty() || v == "0" || v == "false" || v == "off")
            })
            .unwrap_or(false)
    })
}

/// One-line `key=value` trace record on stderr, gated by `WAVECARVE_TRACE`.
pub(crate) fn event(event: &str, detail: std::fmt::Arguments<'_>) {
    if !trace_enabled() {
        return;
    }
    eprintln!("wavecarve event={event} {detail}");
}
