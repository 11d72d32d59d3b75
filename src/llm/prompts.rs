/// Separator placed between retrieved chunks in the context block
pub const CONTEXT_SEPARATOR: &str = "\n\n----\n\n";

/// Shown in place of weather data when no day could be fetched
pub const NO_WEATHER_DATA: &str = "No weather data available for this period.";

/// Prompt combining retrieved planting guidance, daily weather and the question
pub fn query_prompt(context: &str, weather: &str, question: &str) -> String {
    format!(
        r#"Based on this context about the best temperatures for planting:

{context}

---

And based on the weather for the following days:

{weather}

---

Question: {question}
"#
    )
}

/// Join retrieved chunk texts into one context block
pub fn join_context<S: AsRef<str>>(chunks: &[S]) -> String {
    chunks
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}
