//! Track Decoder - symphonia 解码
//!
//! 把整条音轨解码成交错的 f32 采样，加载时即可校验文件并得到时长与采样率。

use std::io::Cursor;
use std::time::Duration;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::PlayerError;

/// 解码得到的音轨信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackInfo {
    pub duration: Duration,
    pub sample_rate: u32,
    pub channels: u8,
}

/// 完整解码的音轨
#[derive(Debug, Clone)]
pub struct DecodedTrack {
    pub info: TrackInfo,
    /// 交错排列，长度 = 帧数 * 声道数
    pub samples: Vec<f32>,
}

impl DecodedTrack {
    pub fn frames(&self) -> usize {
        self.samples.len() / self.info.channels.max(1) as usize
    }
}

/// 只取音轨信息
pub fn read_track_info(
    data: Vec<u8>,
    extension: Option<&str>,
) -> Result<TrackInfo, PlayerError> {
    decode_track(data, extension).map(|track| track.info)
}

/// 解码整条音轨
pub fn decode_track(data: Vec<u8>, extension: Option<&str>) -> Result<DecodedTrack, PlayerError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(data)), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| PlayerError::LoadFailed(format!("Probe failed: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| PlayerError::LoadFailed("No audio track found".to_string()))?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| PlayerError::LoadFailed("Unknown sample rate".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| PlayerError::LoadFailed(format!("Decoder creation failed: {}", e)))?;

    let track_id = track.id;
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u8)
        .unwrap_or(0);
    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(PlayerError::LoadFailed(format!("Packet read error: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let num_frames = decoded.frames();
                if num_frames == 0 {
                    continue;
                }
                if channels == 0 {
                    channels = spec.channels.count() as u8;
                }
                let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
                sample_buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(sample_buf.samples());
            }
            Err(e) => {
                tracing::warn!("Decode error (skipping packet): {}", e);
                continue;
            }
        }
    }

    let channels = channels.max(1);
    let frames = samples.len() / channels as usize;
    if frames == 0 {
        return Err(PlayerError::LoadFailed("Track contains no audio".to_string()));
    }

    Ok(DecodedTrack {
        info: TrackInfo {
            duration: Duration::from_secs_f64(frames as f64 / sample_rate as f64),
            sample_rate,
            channels,
        },
        samples,
    })
}
