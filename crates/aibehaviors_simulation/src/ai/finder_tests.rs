use bevy::prelude::*;

use crate::ai::finder::{CachePoint, TaggedObjectFinder, DEFAULT_TAG};
use crate::ai::test_utils::{clock_at, MockHost};

#[test]
fn test_default_finder_looks_for_player_every_frame() {
    let finder = TaggedObjectFinder::default();
    assert_eq!(finder.tags(), &[DEFAULT_TAG.to_string()]);
    assert_eq!(finder.cache_point, CachePoint::EveryFrame);
    assert!(!finder.use_custom_tags);
    assert!(finder.is_empty());
}

#[test]
fn test_every_frame_refresh_is_idempotent_within_frame() {
    let mut host = MockHost::new(Vec3::ZERO);
    host.add_object("Player", Vec3::X);
    host.add_object("Player", Vec3::Z);

    let mut finder = TaggedObjectFinder::default();
    let clock = clock_at(0.5, 5);

    assert!(finder.cache_transforms(CachePoint::EveryFrame, &mut host, &clock));
    let first = finder.objects().to_vec();

    assert!(!finder.cache_transforms(CachePoint::EveryFrame, &mut host, &clock));
    assert_eq!(finder.objects(), first.as_slice());
    assert_eq!(host.query_count, 1);

    // Следующий кадр: query снова выполняется
    assert!(finder.cache_transforms(CachePoint::EveryFrame, &mut host, &clock_at(0.6, 6)));
    assert_eq!(host.query_count, 2);
}

#[test]
fn test_changed_tags_reflected_at_next_cache_point() {
    let mut host = MockHost::new(Vec3::ZERO);
    host.add_object("Player", Vec3::X);
    let enemy = host.add_object("Enemy", Vec3::Z);

    let mut finder = TaggedObjectFinder::default();
    let clock = clock_at(0.5, 5);
    finder.cache_transforms(CachePoint::EveryFrame, &mut host, &clock);
    assert_eq!(finder.objects().len(), 1);

    finder.set_tags(vec!["Enemy".to_string()]);
    // Тот же кадр, но теги поменялись: кэш пересчитывается
    assert!(finder.cache_transforms(CachePoint::EveryFrame, &mut host, &clock));
    assert_eq!(finder.objects().len(), 1);
    assert_eq!(finder.objects()[0].entity, enemy);
}

#[test]
fn test_refresh_only_at_configured_cache_point() {
    let mut host = MockHost::new(Vec3::ZERO);
    host.add_object("Player", Vec3::X);

    let mut finder = TaggedObjectFinder::new(vec!["Player".to_string()], CachePoint::OnLoad);
    let clock = clock_at(0.0, 0);

    assert!(!finder.cache_transforms(CachePoint::EveryFrame, &mut host, &clock));
    assert!(!finder.cache_transforms(CachePoint::StateChanged, &mut host, &clock));
    assert!(finder.is_empty());

    assert!(finder.cache_transforms(CachePoint::OnLoad, &mut host, &clock));
    assert_eq!(finder.objects().len(), 1);

    // Объект появился позже: OnLoad кэш его не видит
    host.add_object("Player", Vec3::Y);
    finder.cache_transforms(CachePoint::EveryFrame, &mut host, &clock_at(1.0, 10));
    assert_eq!(finder.objects().len(), 1);
}

#[test]
fn test_object_with_several_tags_listed_once() {
    let mut host = MockHost::new(Vec3::ZERO);
    let both = host.add_object("Player", Vec3::X);
    host.add_object_with_entity(both, "Target", Vec3::X);
    host.add_object("Target", Vec3::Z);

    let mut finder = TaggedObjectFinder::custom(
        vec!["Player".to_string(), "Target".to_string()],
        CachePoint::StateChanged,
    );
    finder.refresh(&mut host, &clock_at(0.0, 0));

    assert!(finder.use_custom_tags);
    assert_eq!(finder.objects().len(), 2);
    assert_eq!(finder.objects()[0].entity, both);
}
