use crate::models::qr_code::QrCodeRecord;

pub const NOT_FOUND_MESSAGE: &str = "QR Code não encontrado ou inativo";
pub const NO_DESTINATION_MESSAGE: &str = "URL de destino não configurada";
pub const LOOKUP_FAILED_MESSAGE: &str = "Erro ao processar QR Code";

/// Why a redirect ended on the error screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectFailure {
    NotFound,
    NoDestination,
    LookupFailed,
}

impl RedirectFailure {
    pub fn message(&self) -> &'static str {
        match self {
            RedirectFailure::NotFound => NOT_FOUND_MESSAGE,
            RedirectFailure::NoDestination => NO_DESTINATION_MESSAGE,
            RedirectFailure::LookupFailed => LOOKUP_FAILED_MESSAGE,
        }
    }
}

/// `Loading` is the entry state; the other two are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectState {
    Loading,
    Redirecting(String),
    Error(RedirectFailure),
}

impl RedirectState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RedirectState::Loading)
    }

    /// Advance from `Loading` given the outcome of the short-id lookup.
    /// Terminal states stay put.
    pub fn resolve<E>(self, lookup: Result<Option<&QrCodeRecord>, E>) -> RedirectState {
        if self.is_terminal() {
            return self;
        }

        match lookup {
            Err(_) => RedirectState::Error(RedirectFailure::LookupFailed),
            Ok(None) => RedirectState::Error(RedirectFailure::NotFound),
            Ok(Some(record)) if !record.is_active => RedirectState::Error(RedirectFailure::NotFound),
            Ok(Some(record)) => match record.destination() {
                Some(destination) => RedirectState::Redirecting(normalize_destination(destination)),
                None => RedirectState::Error(RedirectFailure::NoDestination),
            },
        }
    }
}

fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Prefix `https://` unless the URL already names http(s), or is a
/// `mailto:`/`tel:` link.
pub fn normalize_destination(url: &str) -> String {
    let url = url.trim();
    if has_http_scheme(url) || url.starts_with("mailto:") || url.starts_with("tel:") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}
