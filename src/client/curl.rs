use http::Method;

/// Render a `curl` invocation equivalent to an authenticated API request.
///
/// Only used for debug logging. The bearer token is replaced by `***`.
pub fn render_curl(method: &Method, url: &str, body: Option<&serde_json::Value>) -> String {
    let mut curl = format!("curl -X {} \"{url}\"", method.as_str().to_uppercase());
    curl.push_str(" \\\n  -H \"Authorization: Bearer ***\"");
    curl.push_str(" \\\n  -H \"Content-Type: application/json\"");
    curl.push_str(" \\\n  -H \"Accept: */*\"");

    if let Some(body) = body.filter(|body| !body.is_null()) {
        let pretty = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
        curl.push_str(" \\\n  -d \"");
        curl.push_str(&pretty.replace('"', "\\\""));
        curl.push('"');
    }
    curl
}
