//! Voice Commands

use crate::domain::voice::VoiceSettings;

/// 更新儿童的音色与氛围设置
#[derive(Debug, Clone)]
pub struct UpdateVoiceSettings {
    pub settings: VoiceSettings,
}

/// 登记已上传到存储的自定义音色
#[derive(Debug, Clone)]
pub struct RegisterVoiceUrl {
    pub name: String,
    pub audio_url: String,
}

/// 删除自定义音色
#[derive(Debug, Clone)]
pub struct DeleteVoice {
    pub voice_id: i64,
}
