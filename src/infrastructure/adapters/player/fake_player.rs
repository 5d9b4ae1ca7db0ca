//! Fake Audio Player - 用于测试的播放器
//!
//! 不输出声音，只记录加载 / 卸载次数，并可模拟加载失败与系统回收资源

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::application::ports::{
    AudioMode, AudioPlayerPort, PlayerError, SoundHandle, SoundSource, SoundStatus,
};

#[derive(Debug, Default)]
struct FakePlayerState {
    /// 已加载且未卸载的句柄数
    live_handles: AtomicUsize,
    loads: AtomicU64,
    /// 编号不大于此值的句柄视为已被系统回收
    evicted_up_to: AtomicU64,
    fail_loads: AtomicBool,
    fail_audio_mode: AtomicBool,
    audio_mode_calls: AtomicUsize,
}

/// Fake Audio Player
///
/// Clone 之后共享同一份状态
#[derive(Debug, Clone, Default)]
pub struct FakeAudioPlayer {
    state: Arc<FakePlayerState>,
}

impl FakeAudioPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_handles(&self) -> usize {
        self.state.live_handles.load(Ordering::SeqCst)
    }

    pub fn load_count(&self) -> u64 {
        self.state.loads.load(Ordering::SeqCst)
    }

    pub fn audio_mode_calls(&self) -> usize {
        self.state.audio_mode_calls.load(Ordering::SeqCst)
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.state.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_audio_mode(&self, fail: bool) {
        self.state.fail_audio_mode.store(fail, Ordering::SeqCst);
    }

    /// 模拟系统在后台卸载所有已加载的资源
    pub fn evict_all(&self) {
        let loads = self.state.loads.load(Ordering::SeqCst);
        self.state.evicted_up_to.store(loads, Ordering::SeqCst);
        self.state.live_handles.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl AudioPlayerPort for FakeAudioPlayer {
    async fn set_audio_mode(&self, _mode: &AudioMode) -> Result<(), PlayerError> {
        self.state.audio_mode_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_audio_mode.load(Ordering::SeqCst) {
            return Err(PlayerError::SessionError("fake session failure".into()));
        }
        Ok(())
    }

    async fn load(&self, source: &SoundSource) -> Result<Box<dyn SoundHandle>, PlayerError> {
        if self.state.fail_loads.load(Ordering::SeqCst) {
            return Err(PlayerError::LoadFailed(format!(
                "fake load failure: {}",
                source.path.display()
            )));
        }
        let generation = self.state.loads.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.live_handles.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSound {
            state: self.state.clone(),
            generation,
            loaded: true,
            playing: false,
        }))
    }
}

struct FakeSound {
    state: Arc<FakePlayerState>,
    generation: u64,
    loaded: bool,
    playing: bool,
}

impl FakeSound {
    fn evicted(&self) -> bool {
        self.generation <= self.state.evicted_up_to.load(Ordering::SeqCst)
    }

    fn current(&self) -> SoundStatus {
        let is_loaded = self.loaded && !self.evicted();
        SoundStatus {
            is_loaded,
            is_playing: is_loaded && self.playing,
        }
    }
}

#[async_trait]
impl SoundHandle for FakeSound {
    async fn play(&mut self) -> Result<SoundStatus, PlayerError> {
        if !self.current().is_loaded {
            return Err(PlayerError::NotLoaded);
        }
        self.playing = true;
        Ok(self.current())
    }

    async fn pause(&mut self) -> Result<SoundStatus, PlayerError> {
        if !self.current().is_loaded {
            return Err(PlayerError::NotLoaded);
        }
        self.playing = false;
        Ok(self.current())
    }

    async fn status(&self) -> SoundStatus {
        self.current()
    }

    async fn unload(&mut self) -> Result<(), PlayerError> {
        if self.loaded {
            self.loaded = false;
            self.playing = false;
            if !self.evicted() {
                self.state.live_handles.fetch_sub(1, Ordering::SeqCst);
            }
        }
        Ok(())
    }
}
