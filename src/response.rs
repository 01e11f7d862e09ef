//! Response envelope shared by every ingress endpoint

use serde::{Deserialize, Serialize, Serializer};

/// Numeric outcome code carried in every response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    Ok,
    AuthInvalidToken,
    TenantMissing,
    RbacDenied,
    EsConnection,
    BadInput,
    InternalError,
}

impl ResponseCode {
    pub fn as_u16(&self) -> u16 {
        match self {
            Self::Ok => 0,
            Self::AuthInvalidToken => 1001,
            Self::TenantMissing => 1002,
            Self::RbacDenied => 1003,
            Self::EsConnection => 2001,
            Self::BadInput => 3001,
            Self::InternalError => 9000,
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            1001 => Some(Self::AuthInvalidToken),
            1002 => Some(Self::TenantMissing),
            1003 => Some(Self::RbacDenied),
            2001 => Some(Self::EsConnection),
            3001 => Some(Self::BadInput),
            9000 => Some(Self::InternalError),
            _ => None,
        }
    }
}

impl Serialize for ResponseCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

impl<'de> Deserialize<'de> for ResponseCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u16::deserialize(deserializer)?;
        Self::from_u16(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown response code {}", code)))
    }
}

/// i18n keys; clients render text from these, bodies never carry prose for users
pub struct I18nKey;

impl I18nKey {
    pub const ERROR_BAD_INPUT: &'static str = "error.input.bad";
    pub const ERROR_INVALID_PARAM: &'static str = "error.input.invalid_param";
    pub const ERROR_INTERNAL: &'static str = "error.internal";

    pub const INFO_HEALTH_OK: &'static str = "info.health.ok";
    pub const INFO_QUERY_OK: &'static str = "info.query.ok";
    pub const INFO_ALERTS_OK: &'static str = "info.alerts.ok";
    pub const INFO_STATS_OK: &'static str = "info.stats.ok";
    pub const INFO_INDICES_CONFIG_OK: &'static str = "info.indices.config.ok";
}

/// `{code, i18n_key, data}` body returned by the ingress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractResponse<T> {
    pub code: ResponseCode,
    pub i18n_key: String,
    pub data: T,
}

impl<T> ContractResponse<T> {
    pub fn new(code: ResponseCode, i18n_key: &str, data: T) -> Self {
        Self {
            code,
            i18n_key: i18n_key.to_string(),
            data,
        }
    }

    pub fn ok(i18n_key: &str, data: T) -> Self {
        Self::new(ResponseCode::Ok, i18n_key, data)
    }
}
