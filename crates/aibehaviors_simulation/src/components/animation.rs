//! Animator: минимальный headless аниматор (один слой)
//!
//! Нужен animation-point атаке: она читает normalized time текущего клипа.

use bevy::prelude::*;

use crate::ai::host::AnimationProgress;
use crate::ai::state::AnimationState;

#[derive(Component, Debug, Clone)]
pub struct Animator {
    /// Длина клипа в секундах (все клипы headless аниматора одной длины)
    pub clip_length: f32,
    playing: Option<PlayingClip>,
}

#[derive(Debug, Clone)]
struct PlayingClip {
    name: String,
    speed: f32,
    normalized_time: f32,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Animator {
    pub fn new(clip_length: f32) -> Self {
        Self {
            clip_length,
            playing: None,
        }
    }

    /// Запустить клип с начала
    pub fn play(&mut self, animation: &AnimationState) {
        self.playing = Some(PlayingClip {
            name: animation.name.clone(),
            speed: animation.speed,
            normalized_time: 0.0,
        });
    }

    /// Клип зациклен: normalized time растёт дальше 1.0
    pub fn advance(&mut self, delta: f32) {
        if self.clip_length <= 0.0 {
            return;
        }
        if let Some(clip) = &mut self.playing {
            clip.normalized_time += delta * clip.speed / self.clip_length;
        }
    }

    pub fn progress(&self) -> Option<AnimationProgress> {
        self.playing.as_ref().map(|clip| AnimationProgress {
            name: clip.name.clone(),
            normalized_time: clip.normalized_time,
        })
    }
}
