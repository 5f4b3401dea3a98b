//! AI Events: side effects AI состояний для внешних систем
//!
//! WorldHost превращает host вызовы (аудио, анимация, сообщения, атаки,
//! spawn предметов) в Bevy Events. Presentation слой (звук, рендер, UI)
//! читает их через EventReader, AI core про него не знает.

use bevy::prelude::*;

use crate::ai::host::{AttackData, AudioRequest};
use crate::ai::state::AnimationState;
use crate::item_system::ItemId;

/// Состояние запросило проигрывание звука
#[derive(Event, Debug, Clone)]
pub struct AudioRequested {
    pub entity: Entity,
    pub request: AudioRequest,
}

/// Состояние запустило анимацию
#[derive(Event, Debug, Clone)]
pub struct AnimationRequested {
    pub entity: Entity,
    pub animation: AnimationState,
}

/// Broadcast сообщение AI (например "OnGetHelp")
#[derive(Event, Debug, Clone)]
pub struct AiMessage {
    pub sender: Entity,
    pub message: String,
}

/// Атака применена (урон уже снят с Health цели)
#[derive(Event, Debug, Clone)]
pub struct AttackPerformed {
    pub attack: AttackData,
    /// Health цели после атаки (None: у цели нет Health)
    pub remaining_health: Option<u32>,
}

/// Предмет заспавнен
#[derive(Event, Debug, Clone)]
pub struct ItemSpawned {
    pub item_entity: Entity,
    pub item: ItemId,
    pub position: Vec3,
}

/// Переключить буферы всех AI events (то же, что делает First в App::update)
///
/// Событие живёт два update: текущий и следующий. Ручной степпинг через
/// run_fixed_tick вызывает это раз в тик, иначе очереди растут бесконечно.
pub fn update_ai_events(world: &mut World) {
    update_events::<AudioRequested>(world);
    update_events::<AnimationRequested>(world);
    update_events::<AiMessage>(world);
    update_events::<AttackPerformed>(world);
    update_events::<ItemSpawned>(world);
}

fn update_events<E: Event>(world: &mut World) {
    if let Some(mut events) = world.get_resource_mut::<Events<E>>() {
        events.update();
    }
}
