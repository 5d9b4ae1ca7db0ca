//! Profile Context - 新档案注册

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::ProfileError;

/// 性别，后端使用 `M` / `F`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

impl FromStr for Gender {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Gender::Male),
            "f" | "female" => Ok(Gender::Female),
            _ => Err(ProfileError::InvalidGender(s.to_string())),
        }
    }
}

/// 待注册的儿童档案
///
/// 不变量:
/// - 名字去掉空白后非空
/// - 生日是真实存在的日期，年份在 1000 之后且不晚于今年
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChildProfile {
    name: String,
    gender: Gender,
    birthdate: NaiveDate,
    image_url: String,
}

impl NewChildProfile {
    /// `birthdate` 格式为 `YYYY-MM-DD`，`today` 用于判断年份上限
    pub fn new(
        name: impl Into<String>,
        gender: Gender,
        birthdate: &str,
        today: NaiveDate,
    ) -> Result<Self, ProfileError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }

        let parsed = NaiveDate::parse_from_str(birthdate.trim(), "%Y-%m-%d")
            .map_err(|_| ProfileError::InvalidBirthdate(birthdate.to_string()))?;
        if parsed.year() <= 1000 || parsed.year() > today.year() {
            return Err(ProfileError::InvalidBirthdate(birthdate.to_string()));
        }

        Ok(Self {
            name,
            gender,
            birthdate: parsed,
            image_url: String::new(),
        })
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn birthdate(&self) -> NaiveDate {
        self.birthdate
    }

    /// 未设置头像时为空字符串
    pub fn image_url(&self) -> &str {
        &self.image_url
    }
}
