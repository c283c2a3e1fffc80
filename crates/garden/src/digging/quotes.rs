/// Messages buried under the digging surface, one per day in rotation
pub const QUOTES: &[&str] = &[
    "Every line in the sand is a breath you chose to take",
    "The rake moves slowly and the garden is patient",
    "What is carved today is smoothed tomorrow",
    "Stillness is not the absence of motion",
    "Each stone has its own shadow",
    "Begin again with the next stroke",
    "The deepest groove still holds the light",
    "Sand forgets so that you may start fresh",
    "Walk the path that the rake has drawn",
    "A quiet hand makes an even furrow",
    "Under every surface there is another surface",
    "Leave the garden a little calmer than you found it",
];

/// Quote for `day_of_year` (any day count works, it wraps)
pub fn quote_for_day(day_of_year: u32) -> &'static str {
    QUOTES[day_of_year as usize % QUOTES.len()]
}
