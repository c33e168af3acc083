//! QR payload URLs.

use url::form_urlencoded;

use crate::registrant::Registrant;

/// Build the URL a registrant's QR code points at.
///
/// The five registrant fields are form-encoded in canonical order and joined
/// to `base` with `?`, or with `&` when `base` already has a query string.
#[must_use]
pub fn payload_url(base: &str, registrant: &Registrant) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in registrant.query_pairs() {
        serializer.append_pair(name, value);
    }
    let query = serializer.finish();

    let separator = match base.find('?') {
        Some(idx) if idx + 1 == base.len() || base.ends_with('&') => "",
        Some(_) => "&",
        None => "?",
    };
    format!("{base}{separator}{query}")
}
