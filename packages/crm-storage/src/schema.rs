pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

/// Splits rendered SQL into executable statements, dropping empty fragments.
pub fn statements(sql: &str) -> impl Iterator<Item = &str> {
	sql.split(';').map(str::trim).filter(|statement| !statement.is_empty())
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		match line.trim().strip_prefix("\\ir ").map(str::trim) {
			Some(path) => out.push_str(include_file(path).unwrap_or(line)),
			None => out.push_str(line),
		}

		out.push('\n');
	}

	out
}

fn include_file(path: &str) -> Option<&'static str> {
	let sql = match path {
		"tables/001_users.sql" => include_str!("../../../sql/tables/001_users.sql"),
		"tables/002_sessions.sql" => include_str!("../../../sql/tables/002_sessions.sql"),
		"tables/003_leads.sql" => include_str!("../../../sql/tables/003_leads.sql"),
		"tables/004_call_logs.sql" => include_str!("../../../sql/tables/004_call_logs.sql"),
		"tables/005_reminders.sql" => include_str!("../../../sql/tables/005_reminders.sql"),
		"tables/006_pitch_templates.sql" =>
			include_str!("../../../sql/tables/006_pitch_templates.sql"),
		_ => return None,
	};

	Some(sql)
}
