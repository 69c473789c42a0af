use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};

/// Reads a whole text file into memory.
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}

/// A provider of training words.
///
/// Loaders are pure: they return the words and emit nothing but log records.
pub trait Loader {
	/// Extracts training words from already-read contents.
	fn parse(&self, contents: &str) -> Result<Vec<String>>;

	/// Reads `path` and extracts its training words.
	fn load(&self, path: &Path) -> Result<Vec<String>> {
		let words = self.parse(&read_file(path)?)?;
		debug!("loaded {} words from {}", words.len(), path.display());
		Ok(words)
	}
}

/// One word per line.
///
/// - Splits on `\n` / `\r\n`
/// - Trims and lowercases every line
/// - Skips blank lines
#[derive(Debug, Default, Clone, Copy)]
pub struct WordListLoader;

impl Loader for WordListLoader {
	fn parse(&self, contents: &str) -> Result<Vec<String>> {
		Ok(contents
			.lines()
			.map(str::trim)
			.filter(|line| !line.is_empty())
			.map(str::to_lowercase)
			.collect())
	}
}

/// Country codes per language for the world cities export.
const LANGUAGE_COUNTRIES: [(&str, &[&str]); 4] = [
	("english", &["US", "GB", "CA", "AU", "NZ"]),
	("german", &["DE", "AT", "CH"]),
	(
		"spanish",
		&[
			"AR", "BO", "CL", "CO", "CR", "CU", "DO", "EC", "SV", "GT", "HN", "MX", "NI", "PA", "PY", "PE", "ES",
			"UY",
		],
	),
	("portuguese", &["BR", "PT"]),
];

/// Picks one column of a CSV file with a header row.
///
/// Values are unquoted and lowercased. Rows can optionally be restricted to
/// those whose `filter_column` holds one of `filter_values`.
#[derive(Debug, Clone)]
pub struct CsvColumnLoader {
	column: String,
	filter: Option<(String, Vec<String>)>,
}

impl CsvColumnLoader {
	pub fn new(column: &str) -> Self {
		Self { column: column.to_owned(), filter: None }
	}

	/// Keeps only rows where `column` is one of `values`.
	pub fn with_filter<S: AsRef<str>>(mut self, column: &str, values: &[S]) -> Self {
		let values = values.iter().map(|v| v.as_ref().to_owned()).collect();
		self.filter = Some((column.to_owned(), values));
		self
	}

	/// City names from a world cities export (`city_ascii`, `iso2` columns).
	///
	/// `language` is either a known language name (`english`, `german`,
	/// `spanish`, `portuguese`) or a comma-separated list of ISO 3166-1
	/// alpha-2 codes. `None` keeps every city.
	pub fn world_cities(language: Option<&str>) -> Self {
		let loader = Self::new("city_ascii");
		let Some(language) = language else {
			return loader;
		};

		let countries: Vec<String> = match LANGUAGE_COUNTRIES.iter().find(|(name, _)| *name == language) {
			Some((_, codes)) => codes.iter().map(|c| (*c).to_owned()).collect(),
			None => language
				.split(',')
				.map(|code| code.trim().to_owned())
				.filter(|code| !code.is_empty())
				.collect(),
		};
		loader.with_filter("iso2", &countries)
	}

	/// Names from the Greek mythology export (`name-english` column).
	pub fn greek_mythology() -> Self {
		Self::new("name-english")
	}
}

impl Loader for CsvColumnLoader {
	fn parse(&self, contents: &str) -> Result<Vec<String>> {
		let mut lines = contents.lines().filter(|line| !line.trim().is_empty());
		let header = split_record(lines.next().unwrap_or_default());

		let column_index = |name: &str| {
			header
				.iter()
				.position(|field| field == name)
				.ok_or_else(|| Error::MissingColumn { column: name.to_owned() })
		};
		let field_index = column_index(&self.column)?;
		let filter = match &self.filter {
			Some((column, values)) => Some((column_index(column)?, values)),
			None => None,
		};

		let mut words = Vec::new();
		for line in lines {
			let record = split_record(line);
			if let Some((index, values)) = filter {
				match record.get(index) {
					Some(value) if values.contains(value) => {}
					_ => continue,
				}
			}
			if let Some(value) = record.get(field_index) {
				let value = value.trim();
				if !value.is_empty() {
					words.push(value.to_lowercase());
				}
			}
		}

		Ok(words)
	}
}

/// Splits one CSV record.
///
/// Double quotes delimit fields that may contain commas; `""` inside a
/// quoted field is a literal quote.
fn split_record(line: &str) -> Vec<String> {
	let mut fields = Vec::new();
	let mut field = String::new();
	let mut quoted = false;
	let mut chars = line.trim_end_matches('\r').chars().peekable();

	while let Some(c) = chars.next() {
		match c {
			'"' if quoted && chars.peek() == Some(&'"') => {
				field.push('"');
				chars.next();
			}
			'"' => quoted = !quoted,
			',' if !quoted => fields.push(std::mem::take(&mut field)),
			_ => field.push(c),
		}
	}
	fields.push(field);
	fields
}
