/// Clean lesson HTML with ammonia's whitelist.
///
/// Safe structural tags (`<h2>`, `<p>`, `<pre>`, `<code>`) survive; scripts,
/// event-handler attributes and unclosed tags left by truncated content are
/// stripped or closed.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
