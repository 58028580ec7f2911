fn tile_index(coord: f32) -> i64 {
    (coord / TILE_SIZE_PX).floor() as i64
}

/// What a wall does to horizontal speed: the player stops, enemies turn around.
fn wall_response(kind: EntityKind, velocity_x: f32) -> f32 {
    match kind {
        EntityKind::Player => 0.0,
        EntityKind::Enemy => -velocity_x,
    }
}

/// Axis-separated sweep against the grid: move and resolve X, then Y.
fn resolve_grid_collision(entity: &mut Entity, grid: &TileGrid) {
    entity.position.x += entity.velocity.x;

    let left = tile_index(entity.position.x);
    let right = tile_index(entity.position.x + entity.size.x);
    let top = tile_index(entity.position.y);
    // The epsilon keeps a box resting flush on a floor from probing the row below.
    let bottom = tile_index(entity.position.y + entity.size.y - COLLISION_EDGE_EPSILON);

    if entity.velocity.x > 0.0 && (grid.is_solid_at(right, top) || grid.is_solid_at(right, bottom))
    {
        entity.position.x = right as f32 * TILE_SIZE_PX - entity.size.x;
        entity.velocity.x = wall_response(entity.kind, entity.velocity.x);
    } else if entity.velocity.x < 0.0
        && (grid.is_solid_at(left, top) || grid.is_solid_at(left, bottom))
    {
        entity.position.x = (left + 1) as f32 * TILE_SIZE_PX;
        entity.velocity.x = wall_response(entity.kind, entity.velocity.x);
    }

    entity.position.y += entity.velocity.y;

    // Probe columns pinch in so side walls do not grab during vertical moves.
    let left = tile_index(entity.position.x + SIDE_PROBE_INSET_PX);
    let right = tile_index(entity.position.x + entity.size.x - SIDE_PROBE_INSET_PX);
    let top = tile_index(entity.position.y);
    let bottom = tile_index(entity.position.y + entity.size.y);

    if entity.velocity.y > 0.0 && (grid.is_solid_at(left, bottom) || grid.is_solid_at(right, bottom))
    {
        entity.position.y = bottom as f32 * TILE_SIZE_PX - entity.size.y;
        entity.velocity.y = 0.0;
    } else if entity.velocity.y < 0.0
        && (grid.is_solid_at(left, top) || grid.is_solid_at(right, top))
    {
        entity.position.y = (top + 1) as f32 * TILE_SIZE_PX;
        entity.velocity.y = 0.0;
    }
}

fn is_on_ground(entity: &Entity, grid: &TileGrid) -> bool {
    let probe_row = tile_index(entity.position.y + entity.size.y + 1.0);
    if probe_row >= grid.rows as i64 {
        return false;
    }
    grid.is_solid_at(tile_index(entity.position.x + SIDE_PROBE_INSET_PX), probe_row)
        || grid.is_solid_at(
            tile_index(entity.position.x + entity.size.x - SIDE_PROBE_INSET_PX),
            probe_row,
        )
}

fn update_player(player: &mut Entity, grid: &TileGrid, input: &InputSnapshot, step_scale: f32) {
    if input.is_down(InputAction::MoveRight) {
        player.velocity.x += WALK_ACCELERATION * step_scale;
    } else if input.is_down(InputAction::MoveLeft) {
        player.velocity.x -= WALK_ACCELERATION * step_scale;
    } else {
        // Damping is per step, not per scaled time.
        player.velocity.x *= GROUND_FRICTION;
    }
    player.velocity.x = player.velocity.x.clamp(-MAX_WALK_SPEED, MAX_WALK_SPEED);

    player.velocity.y = (player.velocity.y + GRAVITY_PER_STEP * step_scale).min(MAX_FALL_SPEED);
    // The impulse applies after gravity so takeoff speed is exact.
    if input.is_down(InputAction::Jump) && is_on_ground(player, grid) {
        player.velocity.y = JUMP_IMPULSE;
    }

    resolve_grid_collision(player, grid);
}

fn update_enemy(enemy: &mut Entity, grid: &TileGrid, step_scale: f32) {
    if enemy.dead {
        return;
    }
    enemy.velocity.y = (enemy.velocity.y + GRAVITY_PER_STEP * step_scale).min(MAX_FALL_SPEED);
    resolve_grid_collision(enemy, grid);
}

fn aabb_overlap(a: &Entity, b: &Entity) -> bool {
    a.position.x < b.position.x + b.size.x
        && a.position.x + a.size.x > b.position.x
        && a.position.y < b.position.y + b.size.y
        && a.position.y + a.size.y > b.position.y
}

/// A stomp needs the player's feet strictly above the enemy's midline while
/// still moving down. A tie counts as side contact.
fn hit_from_above(player: &Entity, enemy: &Entity) -> bool {
    player.position.y + player.size.y < enemy.position.y + enemy.size.y / 2.0
        && player.velocity.y > 0.0
}
