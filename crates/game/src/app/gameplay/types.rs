#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EntityId(u64);

#[derive(Debug, Default)]
struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// One cell of the course grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tile {
    Empty,
    Ground,
    Brick,
    Question,
    Block,
    PipeLeft,
    // Never produced by the row parser.
    #[allow(dead_code)]
    PipeRight,
    FlagPole,
    // Never produced by the row parser.
    #[allow(dead_code)]
    FlagTop,
}

impl Tile {
    /// Whether walking and falling entities collide with this cell.
    fn is_solid(self) -> bool {
        matches!(
            self,
            Tile::Ground | Tile::Brick | Tile::Question | Tile::Block | Tile::PipeLeft
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityKind {
    Player,
    Enemy,
}

/// A moving box in pixel space. Position is the top-left corner.
#[derive(Debug, Clone)]
struct Entity {
    id: EntityId,
    kind: EntityKind,
    position: Vec2,
    velocity: Vec2,
    size: Vec2,
    dead: bool,
}

impl Entity {
    fn player(id: EntityId) -> Self {
        Self {
            id,
            kind: EntityKind::Player,
            position: PLAYER_SPAWN,
            velocity: Vec2::default(),
            size: PLAYER_SIZE,
            dead: false,
        }
    }

    fn enemy(id: EntityId, position: Vec2) -> Self {
        Self {
            id,
            kind: EntityKind::Enemy,
            position,
            velocity: Vec2 {
                x: ENEMY_PATROL_SPEED,
                y: 0.0,
            },
            size: ENEMY_SIZE,
            dead: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimPhase {
    Running,
    Won,
    Lost,
}

/// Emitted by the session for the shell to react to, at most once per change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimEvent {
    ScoreChanged(u32),
    Won,
    Lost,
}
