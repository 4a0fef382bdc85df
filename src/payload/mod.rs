//! Payload construction for every supported QR kind.
//!
//! A [`QrRequest`] pairs a kind with the field record that kind owns. Each
//! record knows how to turn itself into the exact text a scanning app expects
//! and whether it carries enough input to be worth encoding.

pub mod fields;
pub mod uri;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use fields::{
    EmailData, PdfData, SmsData, SocialData, SocialPlatform, TextData, UrlData, VCardData,
    WhatsAppData, WifiData, WifiEncryption,
};

pub trait Payload {
    /// Text to embed in the QR matrix. Total for any input.
    fn encode(&self) -> String;

    /// Whether the primary identifying field is filled in.
    fn is_ready(&self) -> bool;
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QrKind {
    Url,
    Text,
    Wifi,
    Vcard,
    Email,
    Whatsapp,
    Sms,
    Pdf,
    Social,
}

impl QrKind {
    pub const ALL: [QrKind; 9] = [
        QrKind::Url,
        QrKind::Text,
        QrKind::Wifi,
        QrKind::Vcard,
        QrKind::Email,
        QrKind::Whatsapp,
        QrKind::Sms,
        QrKind::Pdf,
        QrKind::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QrKind::Url => "url",
            QrKind::Text => "text",
            QrKind::Wifi => "wifi",
            QrKind::Vcard => "vcard",
            QrKind::Email => "email",
            QrKind::Whatsapp => "whatsapp",
            QrKind::Sms => "sms",
            QrKind::Pdf => "pdf",
            QrKind::Social => "social",
        }
    }
}

impl fmt::Display for QrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QrKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QrKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown QR kind: {s}"))
    }
}

/// One kind together with its field record, e.g.
/// `{"kind": "wifi", "fields": {"ssid": "Home", ...}}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "fields", rename_all = "lowercase")]
pub enum QrRequest {
    Url(UrlData),
    Text(TextData),
    Wifi(WifiData),
    Vcard(VCardData),
    Email(EmailData),
    Whatsapp(WhatsAppData),
    Sms(SmsData),
    Pdf(PdfData),
    Social(SocialData),
}

impl QrRequest {
    pub fn kind(&self) -> QrKind {
        match self {
            QrRequest::Url(_) => QrKind::Url,
            QrRequest::Text(_) => QrKind::Text,
            QrRequest::Wifi(_) => QrKind::Wifi,
            QrRequest::Vcard(_) => QrKind::Vcard,
            QrRequest::Email(_) => QrKind::Email,
            QrRequest::Whatsapp(_) => QrKind::Whatsapp,
            QrRequest::Sms(_) => QrKind::Sms,
            QrRequest::Pdf(_) => QrKind::Pdf,
            QrRequest::Social(_) => QrKind::Social,
        }
    }

    fn fields(&self) -> &dyn Payload {
        match self {
            QrRequest::Url(data) => data,
            QrRequest::Text(data) => data,
            QrRequest::Wifi(data) => data,
            QrRequest::Vcard(data) => data,
            QrRequest::Email(data) => data,
            QrRequest::Whatsapp(data) => data,
            QrRequest::Sms(data) => data,
            QrRequest::Pdf(data) => data,
            QrRequest::Social(data) => data,
        }
    }

    /// The encoded payload, or `None` while the request is not ready.
    pub fn try_encode(&self) -> Option<String> {
        self.is_ready().then(|| self.encode())
    }
}

impl Payload for QrRequest {
    fn encode(&self) -> String {
        self.fields().encode()
    }

    fn is_ready(&self) -> bool {
        self.fields().is_ready()
    }
}
