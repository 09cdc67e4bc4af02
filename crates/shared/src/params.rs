/// Ordered simulator parameters: `(argument key, rendered value)`.
pub type ParamList = Vec<(&'static str, String)>;

/// Renders parameters as `--key=value` command-line arguments, keeping order.
pub fn encode_args(params: &[(&str, String)]) -> Vec<String> {
    params
        .iter()
        .map(|(key, value)| format!("--{}={}", key, value))
        .collect()
}

/// Joins arguments into the single string `ns3 run` expects after the script path.
pub fn join_args(args: &[String]) -> String {
    args.join(" ")
}
