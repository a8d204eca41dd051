use gpfleet_kernel::Topology;

/// Substitute per-segment placeholders in a command template.
/// Unknown content ids only get `{content}` filled in.
pub fn render(template: &str, topology: &Topology, content_id: i32) -> String {
    let rendered = template.replace("{content}", &content_id.to_string());
    match topology.segment_for(content_id) {
        Ok(seg) => rendered
            .replace("{dbid}", &seg.dbid.to_string())
            .replace("{host}", &seg.hostname)
            .replace("{port}", &seg.port.to_string())
            .replace("{datadir}", &seg.data_dir),
        Err(_) => rendered,
    }
}
