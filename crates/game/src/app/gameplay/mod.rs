//! The platformer itself: course parsing, simulation, sprites, and the
//! menu/run/end-screen shell that drives it all behind the engine's `Scene`.

use std::mem;
use std::sync::mpsc::{Receiver, TryRecvError};

use flagrun_engine::{
    draw_text, measure_text, FramePainter, InputAction, InputSnapshot, Scene, SceneCommand,
    SpriteBitmap, Vec2,
};
use thiserror::Error;
use tracing::{info, warn};

use super::levelgen::{self, GenerationConfig, LevelFetchError};

const TILE_SIZE_PX: f32 = 16.0;
const SCREEN_WIDTH_PX: f32 = 256.0;
const SCREEN_HEIGHT_PX: f32 = 240.0;

const GRAVITY_PER_STEP: f32 = 0.22;
const MAX_FALL_SPEED: f32 = 4.0;
const JUMP_IMPULSE: f32 = -6.0;
const WALK_ACCELERATION: f32 = 0.08;
const GROUND_FRICTION: f32 = 0.9;
const MAX_WALK_SPEED: f32 = 1.6;
const STOMP_BOUNCE_IMPULSE: f32 = JUMP_IMPULSE * 0.5;
const STOMP_SCORE: u32 = 100;

const WIN_MARGIN_PX: f32 = 50.0;
const CAMERA_LEAD_FRACTION: f32 = 0.4;
const COLLISION_EDGE_EPSILON: f32 = 0.1;
const SIDE_PROBE_INSET_PX: f32 = 2.0;

const PLAYER_SPAWN: Vec2 = Vec2 { x: 50.0, y: 100.0 };
const PLAYER_SIZE: Vec2 = Vec2 { x: 12.0, y: 16.0 };
const ENEMY_SIZE: Vec2 = Vec2 { x: 16.0, y: 16.0 };
const ENEMY_PATROL_SPEED: f32 = -0.5;
const RUN_FRAME_SPEED: f32 = 0.1;

const SKY_COLOR: [u8; 4] = [92, 148, 252, 255];
const TITLE_COLOR: [u8; 4] = [248, 216, 32, 255];
const HUD_TEXT_COLOR: [u8; 4] = [255, 255, 255, 255];
const DIM_TEXT_COLOR: [u8; 4] = [200, 200, 200, 255];
const BANNER_DIM_COLOR: [u8; 4] = [0, 0, 0, 176];

const MENU_TITLE: &str = "FLAGRUN";
const WIN_BANNER: &str = "COURSE CLEAR";
const LOSE_BANNER: &str = "GAME OVER";

include!("types.rs");
include!("level.rs");
include!("physics.rs");
include!("session.rs");
include!("sprites.rs");
include!("scene_impl.rs");

pub(crate) fn build_scene(generation: GenerationConfig) -> Box<dyn Scene> {
    Box::new(PlatformerScene::new(generation))
}
