/// Normalizes a phone cell from a spreadsheet export.
///
/// Numeric cells often arrive as `9876543210.0`; the fractional tail is dropped before every
/// non-digit character is stripped. Returns `None` when no digits remain.
pub fn normalize_phone(raw: &str) -> Option<String> {
	let trimmed = raw.trim();
	let integral = match trimmed.split_once('.') {
		Some((head, _)) => head,
		None => trimmed,
	};
	let digits: String = integral.chars().filter(char::is_ascii_digit).collect();

	if digits.is_empty() { None } else { Some(digits) }
}
