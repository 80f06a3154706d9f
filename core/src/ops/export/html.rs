use super::{escape_markup, ExportSource};

const STYLE: &str = "body{font-family:Georgia,serif;max-width:48rem;margin:2rem auto;color:#1f2937}\
h1{margin-bottom:.25rem}.meta{color:#6b7280;margin-top:0}\
li{margin-bottom:1rem;page-break-inside:avoid}.detail{color:#4b5563;margin:.1rem 0}\
.inscription{font-style:italic}.visited{color:#059669;font-size:.85em}\
@media print{body{margin:0}}";

pub(super) fn to_html(source: &ExportSource<'_>) -> String {
	let title = escape_markup(&source.title);

	let mut html = format!(
		"<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n"
	);

	html.push_str(&format!(
		"<p class=\"meta\">{} plaques &middot; generated {}</p>\n",
		source.plaques.len(),
		source.generated_at.format("%-d %B %Y")
	));
	if let Some(description) = &source.description {
		html.push_str(&format!("<p>{}</p>\n", escape_markup(description)));
	}

	html.push_str("<ol>\n");
	for &plaque in &source.plaques {
		html.push_str(&format!("<li><strong>{}</strong>", escape_markup(&plaque.title)));
		if source.is_visited(plaque) {
			html.push_str(" <span class=\"visited\">visited</span>");
		}
		html.push('\n');

		for (class, value) in [
			("detail", plaque.address.as_deref()),
			("detail", plaque.profession.as_deref()),
			("detail inscription", plaque.inscription.as_deref()),
		] {
			if let Some(value) = pq_utils::non_blank(value) {
				html.push_str(&format!(
					"<p class=\"{class}\">{}</p>\n",
					escape_markup(value)
				));
			}
		}
		html.push_str("</li>\n");
	}
	html.push_str("</ol>\n</body>\n</html>\n");

	html
}
