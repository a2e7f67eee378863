//! HTML rendering for the public status page.
//!
//! Probe-supplied text is untrusted, so every interpolated value goes
//! through [`escape_html`].

use crate::domain::Incident;

/// Escape text for use in HTML element content and quoted attributes.
pub(crate) fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render the page listing `incidents` under `title`.
pub(crate) fn render(title: &str, incidents: &[Incident]) -> String {
    let title = escape_html(title);
    let mut html = String::with_capacity(1024 + incidents.len() * 160);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta http-equiv=\"refresh\" content=\"60\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{title}</h1>\n"));

    if incidents.is_empty() {
        html.push_str("<p class=\"all-clear\">No open incidents.</p>\n");
    } else {
        html.push_str("<table>\n<thead>\n<tr><th>Device</th><th>Type</th><th>Date</th>");
        html.push_str("<th>Time</th><th>Details</th></tr>\n</thead>\n<tbody>\n");
        for incident in incidents {
            html.push_str(&format!(
                "<tr class=\"{kind}\"><td>{device}</td><td>{kind_label}</td><td>{date}</td>\
                 <td>{time}</td><td>{details}</td></tr>\n",
                kind = incident.incident_type.as_str().to_ascii_lowercase(),
                device = incident.device_id,
                kind_label = incident.incident_type,
                date = escape_html(&incident.date),
                time = escape_html(&incident.time),
                details = escape_html(&incident.details),
            ));
        }
        html.push_str("</tbody>\n</table>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}
