#[derive(Debug, Error, PartialEq, Eq)]
enum LevelError {
    #[error("level has no rows")]
    NoRows,
    #[error("level rows are all empty")]
    NoColumns,
}

/// Static course geometry, row-major.
#[derive(Debug, Clone)]
struct TileGrid {
    columns: usize,
    rows: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Cell lookup with the out-of-range convention the resolver relies on:
    /// rows outside the grid read as open sky, columns outside as ground walls.
    fn tile_at(&self, column: i64, row: i64) -> Tile {
        if row < 0 || row >= self.rows as i64 {
            return Tile::Empty;
        }
        if column < 0 || column >= self.columns as i64 {
            return Tile::Ground;
        }
        self.tiles[row as usize * self.columns + column as usize]
    }

    fn is_solid_at(&self, column: i64, row: i64) -> bool {
        self.tile_at(column, row).is_solid()
    }

    fn pixel_width(&self) -> f32 {
        self.columns as f32 * TILE_SIZE_PX
    }
}

#[derive(Debug)]
struct ParsedLevel {
    grid: TileGrid,
    enemies: Vec<Entity>,
}

fn parse_level(rows: &[String], ids: &mut EntityIdAllocator) -> Result<ParsedLevel, LevelError> {
    if rows.is_empty() {
        return Err(LevelError::NoRows);
    }
    let columns = rows
        .iter()
        .map(|row| row.chars().count())
        .max()
        .unwrap_or(0);
    if columns == 0 {
        return Err(LevelError::NoColumns);
    }

    let mut tiles = Vec::with_capacity(columns * rows.len());
    let mut enemies = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        let mut row_len = 0;
        for (column_index, glyph) in row.chars().enumerate() {
            row_len += 1;
            if glyph == 'E' {
                enemies.push(Entity::enemy(
                    ids.allocate(),
                    Vec2 {
                        x: column_index as f32 * TILE_SIZE_PX,
                        y: row_index as f32 * TILE_SIZE_PX,
                    },
                ));
                tiles.push(Tile::Empty);
            } else {
                tiles.push(tile_from_glyph(glyph));
            }
        }
        // Ragged rows pad out with empty sky.
        tiles.extend(std::iter::repeat(Tile::Empty).take(columns - row_len));
    }

    Ok(ParsedLevel {
        grid: TileGrid {
            columns,
            rows: rows.len(),
            tiles,
        },
        enemies,
    })
}

fn tile_from_glyph(glyph: char) -> Tile {
    match glyph {
        '#' => Tile::Ground,
        'B' => Tile::Brick,
        '?' => Tile::Question,
        'T' => Tile::Block,
        'P' => Tile::PipeLeft,
        'F' => Tile::FlagPole,
        _ => Tile::Empty,
    }
}
