/// One run of one course: grid, entities, camera, score, and outcome.
struct Session {
    grid: TileGrid,
    enemies: Vec<Entity>,
    player: Entity,
    camera_x: f32,
    score: u32,
    phase: SimPhase,
    events: Vec<SimEvent>,
}

impl Session {
    fn new(rows: &[String]) -> Result<Self, LevelError> {
        let mut ids = EntityIdAllocator::default();
        let parsed = parse_level(rows, &mut ids)?;
        let player = Entity::player(ids.allocate());
        Ok(Self {
            grid: parsed.grid,
            enemies: parsed.enemies,
            player,
            camera_x: 0.0,
            score: 0,
            phase: SimPhase::Running,
            events: Vec::new(),
        })
    }

    /// Advance the simulation by one step. Settled sessions ignore ticks.
    fn tick(&mut self, step_scale: f32, input: &InputSnapshot) {
        if self.phase != SimPhase::Running || self.player.dead {
            return;
        }

        update_player(&mut self.player, &self.grid, input, step_scale);

        let mut contact_death = false;
        for enemy in &mut self.enemies {
            if enemy.dead || !aabb_overlap(&self.player, enemy) {
                continue;
            }
            if hit_from_above(&self.player, enemy) {
                enemy.dead = true;
                self.player.velocity.y = STOMP_BOUNCE_IMPULSE;
                self.score = self.score.saturating_add(STOMP_SCORE);
                self.events.push(SimEvent::ScoreChanged(self.score));
                info!(enemy_id = enemy.id.0, score = self.score, "enemy_stomped");
            } else {
                contact_death = true;
            }
        }
        if contact_death {
            self.player.dead = true;
            self.transition(SimPhase::Lost);
        }

        for enemy in &mut self.enemies {
            update_enemy(enemy, &self.grid, step_scale);
        }
        // Squashed enemies stay as settled corpses; one killed mid-air vanishes.
        self.enemies
            .retain(|enemy| !enemy.dead || enemy.velocity.y == 0.0);

        self.camera_x = (self.player.position.x - SCREEN_WIDTH_PX * CAMERA_LEAD_FRACTION)
            .min(self.grid.pixel_width() - SCREEN_WIDTH_PX)
            .max(0.0);

        if self.player.position.x > self.grid.pixel_width() - WIN_MARGIN_PX {
            self.transition(SimPhase::Won);
        }
        if self.player.position.y > SCREEN_HEIGHT_PX {
            self.player.dead = true;
            self.transition(SimPhase::Lost);
        }
    }

    fn transition(&mut self, next: SimPhase) {
        if self.phase == next {
            return;
        }
        self.phase = next;
        match next {
            SimPhase::Won => self.events.push(SimEvent::Won),
            SimPhase::Lost => self.events.push(SimEvent::Lost),
            SimPhase::Running => {}
        }
    }

    fn drain_events(&mut self) -> Vec<SimEvent> {
        mem::take(&mut self.events)
    }
}
