#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScenePhase {
    Menu,
    Playing,
    GameOver,
    CourseClear,
}

/// The shell: menu, active run, and end screens behind one `Scene`.
struct PlatformerScene {
    generation: GenerationConfig,
    phase: ScenePhase,
    session: Option<Session>,
    sprites: SpriteAtlas,
    pending_fetch: Option<Receiver<Result<Vec<String>, LevelFetchError>>>,
}

impl PlatformerScene {
    fn new(generation: GenerationConfig) -> Self {
        Self {
            generation,
            phase: ScenePhase::Menu,
            session: None,
            sprites: SpriteAtlas::new(),
            pending_fetch: None,
        }
    }

    fn poll_pending_fetch(&mut self) {
        let Some(receiver) = &self.pending_fetch else {
            return;
        };
        let outcome = receiver.try_recv();
        match outcome {
            Ok(Ok(rows)) => {
                self.pending_fetch = None;
                self.begin_run(rows);
            }
            Ok(Err(error)) => {
                warn!(error = %error, "level_fetch_failed");
                self.pending_fetch = None;
                self.begin_run(levelgen::default_level_rows());
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                warn!("level_fetch_worker_disconnected");
                self.pending_fetch = None;
                self.begin_run(levelgen::default_level_rows());
            }
        }
    }

    fn request_generation(&mut self) {
        info!(model = %self.generation.model, "level_fetch_requested");
        self.pending_fetch = Some(levelgen::spawn_fetch(self.generation.clone()));
    }

    fn begin_run(&mut self, rows: Vec<String>) {
        let digest = levelgen::level_digest(&rows);
        let session = match Session::new(&rows) {
            Ok(session) => session,
            Err(error) => {
                warn!(error = %error, "level_rejected");
                match Session::new(&levelgen::default_level_rows()) {
                    Ok(session) => session,
                    Err(error) => {
                        // The built-in course always parses; bail out if it somehow does not.
                        warn!(error = %error, "fallback_level_rejected");
                        self.phase = ScenePhase::Menu;
                        return;
                    }
                }
            }
        };
        info!(
            digest = %digest,
            columns = session.grid.columns,
            rows = session.grid.rows,
            enemy_count = session.enemies.len(),
            "level_loaded"
        );
        self.session = Some(session);
        self.phase = ScenePhase::Playing;
    }

    fn render_world(&self, painter: &mut FramePainter<'_>) {
        let Some(session) = &self.session else {
            return;
        };
        let camera_x = session.camera_x;

        let start_column = tile_index(camera_x);
        let end_column = start_column + (SCREEN_WIDTH_PX / TILE_SIZE_PX) as i64 + 1;
        for row in 0..session.grid.rows as i64 {
            for column in start_column..=end_column {
                if column < 0 || column >= session.grid.columns as i64 {
                    continue;
                }
                let Some(sprite) = self.sprites.tile_sprite(session.grid.tile_at(column, row))
                else {
                    continue;
                };
                let px = (column as f32 * TILE_SIZE_PX - camera_x).floor() as i32;
                let py = (row as f32 * TILE_SIZE_PX) as i32;
                painter.blit(sprite, px, py, false);
            }
        }

        for enemy in &session.enemies {
            let px = (enemy.position.x - camera_x).floor() as i32;
            let py = enemy.position.y.floor() as i32;
            if enemy.dead {
                painter.blit_squashed(&self.sprites.enemy, px, py + 8, 8);
            } else {
                painter.blit(&self.sprites.enemy, px, py, false);
            }
        }

        let player = &session.player;
        if !player.dead {
            let sprite = if player.velocity.x.abs() > RUN_FRAME_SPEED {
                &self.sprites.player_run
            } else {
                &self.sprites.player_stand
            };
            let px = (player.position.x - camera_x).floor() as i32;
            let py = player.position.y.floor() as i32;
            painter.blit(sprite, px, py, player.velocity.x < 0.0);
        }
    }

    fn render_hud(&self, painter: &mut FramePainter<'_>) {
        let Some(session) = &self.session else {
            return;
        };
        let label = format!("SCORE {:06}", session.score);
        let (width, _) = measure_text(&label, 2);
        let x = painter.width() as i32 - width - 8;
        draw_text(painter, x, 8, 2, HUD_TEXT_COLOR, &label);
    }

    fn render_menu(&self, painter: &mut FramePainter<'_>) {
        draw_centered_text(painter, MENU_TITLE, 64, 2, TITLE_COLOR);
        if self.pending_fetch.is_some() {
            draw_centered_text(painter, "GENERATING...", 120, 1, HUD_TEXT_COLOR);
        } else {
            draw_centered_text(painter, "ENTER  PLAY", 112, 1, HUD_TEXT_COLOR);
            draw_centered_text(painter, "G  GENERATE NEW COURSE", 124, 1, HUD_TEXT_COLOR);
        }
        draw_centered_text(painter, "ARROWS MOVE  SPACE JUMPS", 200, 1, DIM_TEXT_COLOR);
    }

    fn render_banner(&self, painter: &mut FramePainter<'_>, banner: &str) {
        painter.fill_rect(0, 0, painter.width(), painter.height(), BANNER_DIM_COLOR);
        draw_centered_text(painter, banner, 88, 2, TITLE_COLOR);
        if let Some(session) = &self.session {
            let label = format!("SCORE {:06}", session.score);
            draw_centered_text(painter, &label, 112, 1, HUD_TEXT_COLOR);
        }
        if self.pending_fetch.is_some() {
            draw_centered_text(painter, "GENERATING...", 136, 1, HUD_TEXT_COLOR);
        } else {
            draw_centered_text(painter, "ENTER  RETRY    G  NEW COURSE", 136, 1, HUD_TEXT_COLOR);
        }
    }
}

impl Scene for PlatformerScene {
    fn load(&mut self) {}

    fn update(&mut self, step_scale: f32, input: &InputSnapshot) -> SceneCommand {
        self.poll_pending_fetch();

        match self.phase {
            ScenePhase::Menu => {
                if input.cancel_pressed() {
                    return SceneCommand::Quit;
                }
                if self.pending_fetch.is_none() {
                    if input.confirm_pressed() {
                        self.begin_run(levelgen::default_level_rows());
                    } else if input.regenerate_pressed() {
                        self.request_generation();
                    }
                }
            }
            ScenePhase::Playing => {
                if input.cancel_pressed() {
                    info!("run_abandoned");
                    self.session = None;
                    self.phase = ScenePhase::Menu;
                    return SceneCommand::None;
                }
                if let Some(session) = &mut self.session {
                    session.tick(step_scale, input);
                    for event in session.drain_events() {
                        match event {
                            SimEvent::ScoreChanged(score) => info!(score, "score_changed"),
                            SimEvent::Won => {
                                info!(score = session.score, "run_won");
                                self.phase = ScenePhase::CourseClear;
                            }
                            SimEvent::Lost => {
                                info!(score = session.score, "run_lost");
                                self.phase = ScenePhase::GameOver;
                            }
                        }
                    }
                }
            }
            ScenePhase::GameOver | ScenePhase::CourseClear => {
                if input.cancel_pressed() {
                    self.session = None;
                    self.phase = ScenePhase::Menu;
                } else if self.pending_fetch.is_none() {
                    if input.confirm_pressed() {
                        self.begin_run(levelgen::default_level_rows());
                    } else if input.regenerate_pressed() {
                        self.request_generation();
                    }
                }
            }
        }
        SceneCommand::None
    }

    fn render(&mut self, painter: &mut FramePainter<'_>) {
        painter.clear(SKY_COLOR);
        match self.phase {
            ScenePhase::Menu => self.render_menu(painter),
            ScenePhase::Playing => {
                self.render_world(painter);
                self.render_hud(painter);
            }
            ScenePhase::GameOver => {
                self.render_world(painter);
                self.render_hud(painter);
                self.render_banner(painter, LOSE_BANNER);
            }
            ScenePhase::CourseClear => {
                self.render_world(painter);
                self.render_hud(painter);
                self.render_banner(painter, WIN_BANNER);
            }
        }
    }

    fn unload(&mut self) {
        self.session = None;
        self.pending_fetch = None;
    }

    fn debug_title(&self) -> Option<String> {
        match self.phase {
            ScenePhase::Playing => self
                .session
                .as_ref()
                .map(|session| format!("Flagrun - score {:06}", session.score)),
            _ => None,
        }
    }
}

fn draw_centered_text(
    painter: &mut FramePainter<'_>,
    text: &str,
    y: i32,
    scale: i32,
    color: [u8; 4],
) {
    let (width, _) = measure_text(text, scale);
    let x = (painter.width() as i32 - width) / 2;
    draw_text(painter, x, y, scale, color, text);
}
