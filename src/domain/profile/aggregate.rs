//! Profile Context - Aggregate Root

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ProfileError;

/// 儿童档案
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildProfile {
    id: i64,
    name: String,
    gender: Option<String>,
    birthday: Option<NaiveDate>,
    is_active: bool,
}

impl ChildProfile {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        gender: Option<String>,
        birthday: Option<NaiveDate>,
    ) -> Result<Self, ProfileError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            gender,
            birthday,
            is_active: false,
        })
    }

    // Getters
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn birthday(&self) -> Option<NaiveDate> {
        self.birthday
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

/// 档案列表聚合根
///
/// 不变量:
/// - 任意时刻最多一个档案处于激活状态
/// - 选择某个档案会取消其他所有档案的激活
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileRoster {
    profiles: Vec<ChildProfile>,
}

impl ProfileRoster {
    /// 用持久化的 active id 恢复激活状态
    pub fn new(profiles: Vec<ChildProfile>, active_id: Option<i64>) -> Self {
        let mut roster = Self { profiles };
        roster.apply_active(active_id);
        roster
    }

    /// 选择档案
    pub fn select(&mut self, id: i64) -> Result<&ChildProfile, ProfileError> {
        let index = self
            .profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or(ProfileError::NotFound(id))?;
        self.apply_active(Some(id));
        Ok(&self.profiles[index])
    }

    /// 移除档案，返回被移除的档案是否处于激活状态
    pub fn remove(&mut self, id: i64) -> Result<bool, ProfileError> {
        let index = self
            .profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or(ProfileError::NotFound(id))?;
        let removed = self.profiles.remove(index);
        Ok(removed.is_active)
    }

    pub fn active(&self) -> Option<&ChildProfile> {
        self.profiles.iter().find(|p| p.is_active)
    }

    pub fn get(&self, id: i64) -> Option<&ChildProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn profiles(&self) -> &[ChildProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    fn apply_active(&mut self, active_id: Option<i64>) {
        for profile in &mut self.profiles {
            profile.is_active = Some(profile.id) == active_id;
        }
    }
}
