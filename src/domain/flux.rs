// Flux query construction
//
// Every dynamic value (bucket names, user ids) is routed through
// `string_literal` before it is embedded into Flux source, so a crafted
// user_id cannot break out of its quoted position.

/// Render a raw value as a quoted Flux string literal.
///
/// Escapes backslashes, double quotes and the `${` interpolation opener,
/// the three sequences Flux treats specially inside a quoted string.
pub fn string_literal(raw: &str) -> String {
    let escaped = raw
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("${", "\\${");
    format!("\"{escaped}\"")
}

/// The fixed query behind POST /query: last downsampled row per series for
/// one user over the past 24 hours. Byte-for-byte a function of its inputs.
pub fn last_downsampled(bucket: &str, user_id: &str) -> String {
    format!(
        "from(bucket: {bucket})\n\
         \x20 |> range(start: -1d)\n\
         \x20 |> filter(fn: (r) => r._measurement == \"downsampled\")\n\
         \x20 |> filter(fn: (r) => r.user_id == {user})\n\
         \x20 |> last()",
        bucket = string_literal(bucket),
        user = string_literal(user_id),
    )
}

/// Pipeline for the 5-minute downsampling task: max/min/mean windows over
/// the user's recent points, unioned, relabelled as the "downsampled"
/// measurement and written back to the source bucket.
pub fn downsample_pipeline(bucket: &str, user_id: &str) -> String {
    let bucket = string_literal(bucket);
    let user = string_literal(user_id);
    format!(
        "data = from(bucket: {bucket})\n\
         \x20 |> range(start: -2h)\n\
         \x20 |> filter(fn: (r) => r.user_id == {user})\n\
         \n\
         max = data\n\
         \x20 |> aggregateWindow(every: 5m, fn: max)\n\
         \x20 |> set(key: \"agg_type\", value: \"max\")\n\
         \n\
         min = data\n\
         \x20 |> aggregateWindow(every: 5m, fn: min)\n\
         \x20 |> set(key: \"agg_type\", value: \"min\")\n\
         \n\
         mean = data\n\
         \x20 |> aggregateWindow(every: 5m, fn: mean)\n\
         \x20 |> set(key: \"agg_type\", value: \"mean\")\n\
         \n\
         union(tables: [max, min, mean])\n\
         \x20 |> set(key: \"_measurement\", value: \"downsampled\")\n\
         \x20 |> to(bucket: {bucket})"
    )
}

/// Pipeline for the 1-minute alert task: copy zero-valued points for one
/// user from the source bucket into a dedicated output bucket.
pub fn zero_value_alert_pipeline(source_bucket: &str, output_bucket: &str, user_id: &str) -> String {
    format!(
        "from(bucket: {source})\n\
         \x20 |> range(start: -task.every)\n\
         \x20 |> filter(fn: (r) => r.user_id == {user})\n\
         \x20 |> filter(fn: (r) => r._value == 0.0)\n\
         \x20 |> to(bucket: {output})",
        source = string_literal(source_bucket),
        user = string_literal(user_id),
        output = string_literal(output_bucket),
    )
}
