//! Cpal Track Player - 通过 cpal 输出声音
//!
//! 加载时用 symphonia 解码整条音轨，随后在专用线程上打开默认输出设备。
//! cpal 的 Stream 不能跨线程移动，句柄通过命令通道控制该线程，
//! 卸载时关闭通道，线程退出并释放 Stream。

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use tokio::sync::oneshot;

use super::decoder::{decode_track, DecodedTrack};
use crate::application::ports::{
    AudioMode, AudioPlayerPort, PlayerError, SoundHandle, SoundSource, SoundStatus,
};

// ============================================================================
// 播放游标
// ============================================================================

/// 在解码后的采样上前进的游标
///
/// 按 源采样率 / 设备采样率 的步长取最近帧，声道数不同时按声道序号映射
#[derive(Debug)]
pub struct TrackCursor {
    samples: Vec<f32>,
    channels: usize,
    frames: usize,
    position: f64,
    step: f64,
    looping: bool,
    finished: bool,
}

impl TrackCursor {
    pub fn new(track: DecodedTrack, output_rate: u32, looping: bool) -> Self {
        let channels = track.info.channels.max(1) as usize;
        let frames = track.samples.len() / channels;
        Self {
            samples: track.samples,
            channels,
            frames,
            position: 0.0,
            step: track.info.sample_rate as f64 / output_rate.max(1) as f64,
            looping,
            finished: frames == 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// 当前帧位置
    pub fn frame(&self) -> usize {
        self.position as usize
    }

    /// 播放完毕的非循环音轨重新从头开始
    pub fn rewind_if_finished(&mut self) {
        if self.finished && self.frames > 0 {
            self.position = 0.0;
            self.finished = false;
        }
    }

    /// 填充一段交错输出缓冲，返回音轨是否仍在播放
    pub fn fill(&mut self, out: &mut [f32], out_channels: usize, volume: f32) -> bool {
        let out_channels = out_channels.max(1);
        for frame in out.chunks_mut(out_channels) {
            if self.finished {
                frame.fill(0.0);
                continue;
            }

            if self.position >= self.frames as f64 {
                if self.looping {
                    self.position %= self.frames as f64;
                } else {
                    self.finished = true;
                    frame.fill(0.0);
                    continue;
                }
            }

            let base = self.frame() * self.channels;
            for (c, slot) in frame.iter_mut().enumerate() {
                let src = base + c.min(self.channels - 1);
                *slot = (self.samples[src] * volume).clamp(-1.0, 1.0);
            }
            self.position += self.step;
        }

        // 最后一帧恰好读完时也算结束
        if !self.looping && self.position >= self.frames as f64 {
            self.finished = true;
        }
        !self.finished
    }
}

// ============================================================================
// 输出线程
// ============================================================================

#[derive(Debug, Default)]
struct StreamFlags {
    loaded: AtomicBool,
    playing: AtomicBool,
}

type Reply = oneshot::Sender<Result<(), PlayerError>>;

enum StreamCommand {
    Play(Reply),
    Pause(Reply),
}

/// 音频回调：暂停时输出静音，音轨结束时清除播放标记
fn render(
    cursor: &Mutex<TrackCursor>,
    flags: &StreamFlags,
    out: &mut [f32],
    channels: usize,
    volume: f32,
) {
    if !flags.playing.load(Ordering::SeqCst) {
        out.fill(0.0);
        return;
    }
    let Ok(mut cursor) = cursor.lock() else {
        out.fill(0.0);
        return;
    };
    if !cursor.fill(out, channels, volume) {
        flags.playing.store(false, Ordering::SeqCst);
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    cursor: Arc<Mutex<TrackCursor>>,
    flags: Arc<StreamFlags>,
    volume: f32,
) -> Result<cpal::Stream, PlayerError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let error_flags = flags.clone();
    let mut scratch: Vec<f32> = Vec::new();

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                scratch.resize(data.len(), 0.0);
                render(&cursor, &flags, &mut scratch, channels, volume);
                for (out, sample) in data.iter_mut().zip(scratch.iter()) {
                    *out = <T as cpal::Sample>::from_sample(*sample);
                }
            },
            move |err| {
                // 设备断开等错误后视为资源已被系统回收
                tracing::error!(error = %err, "Audio output stream error");
                error_flags.loaded.store(false, Ordering::SeqCst);
                error_flags.playing.store(false, Ordering::SeqCst);
            },
            None,
        )
        .map_err(|e| PlayerError::LoadFailed(format!("Failed to build output stream: {}", e)))
}

/// 打开默认输出设备并创建暂停状态的 Stream
fn open_stream(
    track: DecodedTrack,
    looping: bool,
    volume: f32,
    flags: Arc<StreamFlags>,
) -> Result<(cpal::Stream, Arc<Mutex<TrackCursor>>), PlayerError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| PlayerError::SessionError("No audio output device available".into()))?;
    let supported = device
        .default_output_config()
        .map_err(|e| PlayerError::SessionError(format!("Failed to get output config: {}", e)))?;

    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();

    tracing::debug!(
        device = %device.name().unwrap_or_else(|_| "unknown".to_string()),
        sample_rate = config.sample_rate.0,
        channels = config.channels,
        format = ?sample_format,
        "Opening audio output"
    );

    let cursor = Arc::new(Mutex::new(TrackCursor::new(
        track,
        config.sample_rate.0,
        looping,
    )));

    let stream = match sample_format {
        cpal::SampleFormat::F32 => {
            build_stream::<f32>(&device, &config, cursor.clone(), flags, volume)?
        }
        cpal::SampleFormat::I16 => {
            build_stream::<i16>(&device, &config, cursor.clone(), flags, volume)?
        }
        cpal::SampleFormat::U16 => {
            build_stream::<u16>(&device, &config, cursor.clone(), flags, volume)?
        }
        other => {
            return Err(PlayerError::SessionError(format!(
                "Unsupported sample format: {:?}",
                other
            )))
        }
    };

    // 部分后端创建后立即开始回调，先保持暂停
    stream
        .pause()
        .map_err(|e| PlayerError::PlaybackError(e.to_string()))?;

    Ok((stream, cursor))
}

/// 输出线程主循环，命令通道关闭时退出并释放 Stream
fn run_output(
    track: DecodedTrack,
    looping: bool,
    volume: f32,
    flags: Arc<StreamFlags>,
    commands: mpsc::Receiver<StreamCommand>,
    ready: Reply,
) {
    let (stream, cursor) = match open_stream(track, looping, volume, flags.clone()) {
        Ok(opened) => opened,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };
    flags.loaded.store(true, Ordering::SeqCst);
    let _ = ready.send(Ok(()));

    while let Ok(command) = commands.recv() {
        match command {
            StreamCommand::Play(reply) => {
                if let Ok(mut cursor) = cursor.lock() {
                    cursor.rewind_if_finished();
                }
                let result = stream
                    .play()
                    .map_err(|e| PlayerError::PlaybackError(e.to_string()));
                if result.is_ok() {
                    flags.playing.store(true, Ordering::SeqCst);
                }
                let _ = reply.send(result);
            }
            StreamCommand::Pause(reply) => {
                flags.playing.store(false, Ordering::SeqCst);
                let result = stream
                    .pause()
                    .map_err(|e| PlayerError::PlaybackError(e.to_string()));
                let _ = reply.send(result);
            }
        }
    }

    flags.playing.store(false, Ordering::SeqCst);
    flags.loaded.store(false, Ordering::SeqCst);
    drop(stream);
    tracing::debug!("Audio output thread finished");
}

// ============================================================================
// 播放器
// ============================================================================

/// 使用默认输出设备的播放器
pub struct CpalTrackPlayer {
    mode: Mutex<Option<AudioMode>>,
}

impl CpalTrackPlayer {
    pub fn new() -> Self {
        Self {
            mode: Mutex::new(None),
        }
    }

    /// 当前音频会话设置
    pub fn audio_mode(&self) -> Option<AudioMode> {
        self.mode.lock().ok().and_then(|m| m.clone())
    }
}

impl Default for CpalTrackPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioPlayerPort for CpalTrackPlayer {
    async fn set_audio_mode(&self, mode: &AudioMode) -> Result<(), PlayerError> {
        let mut slot = self
            .mode
            .lock()
            .map_err(|e| PlayerError::SessionError(e.to_string()))?;
        *slot = Some(mode.clone());
        // 桌面输出设备没有静音键与听筒，这里只记录会话设置
        tracing::debug!(
            interruption_ios = ?mode.interruption_ios,
            interruption_android = ?mode.interruption_android,
            ducks_others = mode.ducks_others(),
            "Audio session configured"
        );
        Ok(())
    }

    async fn load(&self, source: &SoundSource) -> Result<Box<dyn SoundHandle>, PlayerError> {
        let data = tokio::fs::read(&source.path).await.map_err(|e| {
            PlayerError::LoadFailed(format!("{}: {}", source.path.display(), e))
        })?;

        let extension = extension_of(&source.path);
        let track = tokio::task::spawn_blocking(move || decode_track(data, extension.as_deref()))
            .await
            .map_err(|e| PlayerError::LoadFailed(format!("Decode task failed: {}", e)))??;

        let info = track.info;
        let looping = source.looping;
        let volume = source.volume.clamp(0.0, 1.0);
        let flags = Arc::new(StreamFlags::default());
        let (command_tx, command_rx) = mpsc::channel();
        let (ready_tx, ready_rx) = oneshot::channel();

        let thread_flags = flags.clone();
        std::thread::Builder::new()
            .name("aieng-audio-output".into())
            .spawn(move || run_output(track, looping, volume, thread_flags, command_rx, ready_tx))
            .map_err(|e| PlayerError::LoadFailed(format!("Failed to spawn output thread: {}", e)))?;

        ready_rx
            .await
            .map_err(|_| PlayerError::LoadFailed("Audio output thread exited".into()))??;

        tracing::info!(
            path = %source.path.display(),
            duration_ms = info.duration.as_millis() as u64,
            sample_rate = info.sample_rate,
            channels = info.channels,
            looping,
            volume,
            "Track loaded"
        );

        Ok(Box::new(CpalSound {
            commands: Some(command_tx),
            flags,
        }))
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// 输出线程的控制句柄
struct CpalSound {
    commands: Option<mpsc::Sender<StreamCommand>>,
    flags: Arc<StreamFlags>,
}

impl CpalSound {
    async fn request(&self, make: fn(Reply) -> StreamCommand) -> Result<(), PlayerError> {
        let commands = self.commands.as_ref().ok_or(PlayerError::NotLoaded)?;
        let (reply, response) = oneshot::channel();
        commands
            .send(make(reply))
            .map_err(|_| PlayerError::NotLoaded)?;
        response.await.map_err(|_| PlayerError::NotLoaded)?
    }

    fn current(&self) -> SoundStatus {
        let is_loaded = self.commands.is_some() && self.flags.loaded.load(Ordering::SeqCst);
        SoundStatus {
            is_loaded,
            is_playing: is_loaded && self.flags.playing.load(Ordering::SeqCst),
        }
    }
}

#[async_trait]
impl SoundHandle for CpalSound {
    async fn play(&mut self) -> Result<SoundStatus, PlayerError> {
        self.request(StreamCommand::Play).await?;
        Ok(self.current())
    }

    async fn pause(&mut self) -> Result<SoundStatus, PlayerError> {
        self.request(StreamCommand::Pause).await?;
        Ok(self.current())
    }

    async fn status(&self) -> SoundStatus {
        self.current()
    }

    async fn unload(&mut self) -> Result<(), PlayerError> {
        // 关闭通道后输出线程退出并释放 Stream
        self.commands.take().ok_or(PlayerError::NotLoaded)?;
        self.flags.playing.store(false, Ordering::SeqCst);
        Ok(())
    }
}
