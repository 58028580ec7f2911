/// Pre-rasterized 16x16 sprites, built once at scene construction.
struct SpriteAtlas {
    ground: SpriteBitmap,
    brick: SpriteBitmap,
    question: SpriteBitmap,
    block: SpriteBitmap,
    pipe: SpriteBitmap,
    flag_pole: SpriteBitmap,
    player_stand: SpriteBitmap,
    player_run: SpriteBitmap,
    enemy: SpriteBitmap,
}

impl SpriteAtlas {
    fn new() -> Self {
        Self {
            ground: build_ground_sprite(),
            brick: build_brick_sprite(),
            question: build_question_sprite(),
            block: build_block_sprite(),
            pipe: build_pipe_sprite(),
            flag_pole: build_flag_pole_sprite(),
            player_stand: build_player_sprite(false),
            player_run: build_player_sprite(true),
            enemy: build_enemy_sprite(),
        }
    }

    fn tile_sprite(&self, tile: Tile) -> Option<&SpriteBitmap> {
        match tile {
            Tile::Empty | Tile::FlagTop => None,
            Tile::Ground => Some(&self.ground),
            Tile::Brick => Some(&self.brick),
            Tile::Question => Some(&self.question),
            Tile::Block => Some(&self.block),
            Tile::PipeLeft | Tile::PipeRight => Some(&self.pipe),
            Tile::FlagPole => Some(&self.flag_pole),
        }
    }
}

fn build_ground_sprite() -> SpriteBitmap {
    let mut sprite = SpriteBitmap::new(16, 16);
    sprite.fill(0, 0, 16, 16, [200, 76, 12, 255]);
    sprite.fill(0, 0, 16, 2, [248, 184, 0, 255]);
    sprite.fill(0, 4, 16, 1, [0, 0, 0, 51]);
    sprite.fill(4, 8, 12, 1, [0, 0, 0, 51]);
    sprite
}

fn build_brick_sprite() -> SpriteBitmap {
    let mut sprite = SpriteBitmap::new(16, 16);
    sprite.fill(0, 0, 16, 16, [184, 56, 0, 255]);
    sprite.fill(0, 0, 16, 1, [0, 0, 0, 255]);
    sprite.fill(0, 8, 16, 1, [0, 0, 0, 255]);
    sprite.fill(8, 0, 1, 8, [0, 0, 0, 255]);
    sprite.fill(4, 8, 1, 8, [0, 0, 0, 255]);
    sprite.fill(12, 8, 1, 8, [0, 0, 0, 255]);
    sprite
}

fn build_question_sprite() -> SpriteBitmap {
    let gold = [248, 152, 0, 255];
    let mut sprite = SpriteBitmap::new(16, 16);
    sprite.fill(0, 0, 16, 16, gold);
    sprite.fill(0, 0, 1, 1, [0, 0, 0, 255]);
    sprite.fill(15, 0, 1, 1, [0, 0, 0, 255]);
    sprite.fill(0, 15, 1, 1, [0, 0, 0, 255]);
    sprite.fill(15, 15, 1, 1, [0, 0, 0, 255]);
    sprite.fill(3, 3, 10, 10, [136, 0, 0, 255]);
    // Question mark strokes, drawn back in the block color.
    sprite.fill(6, 4, 4, 2, gold);
    sprite.fill(10, 4, 2, 4, gold);
    sprite.fill(8, 8, 2, 2, gold);
    sprite.fill(8, 11, 2, 2, gold);
    sprite
}

fn build_block_sprite() -> SpriteBitmap {
    let mut sprite = SpriteBitmap::new(16, 16);
    sprite.fill(0, 0, 16, 16, [184, 88, 24, 255]);
    sprite.fill(0, 0, 16, 1, [0, 0, 0, 255]);
    sprite.fill(0, 15, 16, 1, [0, 0, 0, 255]);
    sprite.fill(0, 0, 1, 16, [0, 0, 0, 255]);
    sprite.fill(15, 0, 1, 16, [0, 0, 0, 255]);
    sprite
}

fn build_pipe_sprite() -> SpriteBitmap {
    let mut sprite = SpriteBitmap::new(16, 16);
    sprite.fill(0, 0, 16, 16, [0, 168, 0, 255]);
    sprite.fill(2, 0, 4, 16, [0, 96, 0, 255]);
    sprite.fill(12, 0, 2, 16, [0, 96, 0, 255]);
    sprite.fill(6, 0, 2, 16, [128, 208, 16, 255]);
    sprite
}

fn build_flag_pole_sprite() -> SpriteBitmap {
    let mut sprite = SpriteBitmap::new(16, 16);
    sprite.fill(6, 0, 4, 16, [40, 192, 72, 255]);
    sprite
}

fn build_player_sprite(running: bool) -> SpriteBitmap {
    let cap = [216, 40, 0, 255];
    let skin = [252, 152, 56, 255];
    let overalls = [0, 88, 248, 255];
    let mut sprite = SpriteBitmap::new(16, 16);
    sprite.fill(3, 0, 10, 2, cap);
    sprite.fill(3, 2, 7, 1, skin);
    sprite.fill(10, 2, 1, 1, [0, 0, 0, 255]);
    sprite.fill(3, 3, 9, 1, skin);
    sprite.fill(11, 3, 1, 1, [0, 0, 0, 255]);
    sprite.fill(3, 4, 10, 1, skin);
    sprite.fill(4, 5, 6, 7, overalls);
    sprite.fill(2, 6, 3, 3, cap);
    sprite.fill(9, 6, 3, 3, cap);
    sprite.fill(5, 8, 1, 1, [248, 216, 32, 255]);
    sprite.fill(8, 8, 1, 1, [248, 216, 32, 255]);
    if running {
        sprite.fill(1, 12, 4, 3, overalls);
        sprite.fill(10, 10, 4, 3, overalls);
    } else {
        sprite.fill(2, 12, 4, 4, overalls);
        sprite.fill(8, 12, 4, 4, overalls);
    }
    sprite
}

fn build_enemy_sprite() -> SpriteBitmap {
    let body = [184, 76, 8, 255];
    let mut sprite = SpriteBitmap::new(16, 16);
    // Head silhouette, widest through the middle rows.
    sprite.fill(7, 0, 2, 1, body);
    sprite.fill(6, 1, 4, 1, body);
    sprite.fill(4, 2, 8, 1, body);
    sprite.fill(3, 3, 10, 1, body);
    sprite.fill(2, 4, 12, 2, body);
    sprite.fill(3, 6, 10, 4, body);
    sprite.fill(4, 10, 8, 2, body);
    sprite.fill(4, 5, 3, 4, [255, 255, 255, 255]);
    sprite.fill(9, 5, 3, 4, [255, 255, 255, 255]);
    sprite.fill(5, 6, 1, 2, [0, 0, 0, 255]);
    sprite.fill(10, 6, 1, 2, [0, 0, 0, 255]);
    sprite.fill(2, 12, 4, 4, [0, 0, 0, 255]);
    sprite.fill(10, 12, 4, 4, [0, 0, 0, 255]);
    sprite
}
