//! Tile vocabulary shared by level data, the grid and the interaction rules.
//! Every kind has exactly one glyph; the category predicates below are the only
//! place behavioural groupings are defined.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Bang,
    Beach,
    Beholder,
    Biter,
    BluePotion,
    Bomb,
    BombLit,
    BossDoor,
    BossKey,
    Brazier,
    BrazierLit,
    CaveWall,
    ChaosPortal,
    Chequer,
    Chicken,
    Cloud,
    Devil,
    Door,
    Empty,
    Entrance,
    EntranceTeleport,
    Exit,
    ExitKey,
    FakeExit,
    FrostTree,
    FrostWand,
    Goal,
    Goblin,
    Grave1,
    Grave2,
    HourGlass,
    HpPotion,
    Ice,
    Key,
    Kitty,
    Lava,
    Lightning,
    Magnet,
    PinkPotion,
    RedPotion,
    Safety,
    SecretWall,
    Shield,
    Skeleton,
    Sky,
    Slime,
    Snow,
    SnowBeast,
    SnowTree,
    Stone,
    Switch,
    SwitchLit,
    SwitchTile,
    Sword,
    Teleport1,
    Teleport2,
    Trap,
    Treasure,
    TreasureChest,
    Tree,
    Wall,
    Water,
    Well,
    YellowPotion,
}

const GLYPHS: [(TileKind, char); 64] = [
    (TileKind::Bang, '='),
    (TileKind::Beach, 's'),
    (TileKind::Beholder, '>'),
    (TileKind::Biter, 'A'),
    (TileKind::BluePotion, 'l'),
    (TileKind::Bomb, 'b'),
    (TileKind::BombLit, 'B'),
    (TileKind::BossDoor, 'd'),
    (TileKind::BossKey, '$'),
    (TileKind::Brazier, 'q'),
    (TileKind::BrazierLit, 'Q'),
    (TileKind::CaveWall, '#'),
    (TileKind::ChaosPortal, 'c'),
    (TileKind::Chequer, ']'),
    (TileKind::Chicken, 'C'),
    (TileKind::Cloud, '.'),
    (TileKind::Devil, '£'),
    (TileKind::Door, 'D'),
    (TileKind::Empty, ' '),
    (TileKind::Entrance, '-'),
    (TileKind::EntranceTeleport, '3'),
    (TileKind::Exit, '+'),
    (TileKind::ExitKey, '%'),
    (TileKind::FakeExit, '}'),
    (TileKind::FrostTree, 'F'),
    (TileKind::FrostWand, 'J'),
    (TileKind::Goal, 'G'),
    (TileKind::Goblin, 'X'),
    (TileKind::Grave1, '!'),
    (TileKind::Grave2, '|'),
    (TileKind::HourGlass, 'g'),
    (TileKind::HpPotion, '@'),
    (TileKind::Ice, 'i'),
    (TileKind::Key, '?'),
    (TileKind::Kitty, 'K'),
    (TileKind::Lava, 'H'),
    (TileKind::Lightning, 'L'),
    (TileKind::Magnet, 'U'),
    (TileKind::PinkPotion, 'k'),
    (TileKind::RedPotion, 'S'),
    (TileKind::Safety, '8'),
    (TileKind::SecretWall, ';'),
    (TileKind::Shield, 'O'),
    (TileKind::Skeleton, 'Z'),
    (TileKind::Sky, '~'),
    (TileKind::Slime, '['),
    (TileKind::Snow, 'I'),
    (TileKind::SnowBeast, 'x'),
    (TileKind::SnowTree, 't'),
    (TileKind::Stone, '0'),
    (TileKind::Switch, ','),
    (TileKind::SwitchLit, '<'),
    (TileKind::SwitchTile, '_'),
    (TileKind::Sword, '/'),
    (TileKind::Teleport1, '1'),
    (TileKind::Teleport2, '2'),
    (TileKind::Trap, '^'),
    (TileKind::Treasure, '*'),
    (TileKind::TreasureChest, 'j'),
    (TileKind::Tree, 'T'),
    (TileKind::Wall, ':'),
    (TileKind::Water, 'W'),
    (TileKind::Well, 'w'),
    (TileKind::YellowPotion, 'Y'),
];

impl TileKind {
    pub fn from_glyph(glyph: char) -> Option<Self> {
        GLYPHS.iter().find(|(_, g)| *g == glyph).map(|(kind, _)| *kind)
    }

    pub fn glyph(self) -> char {
        GLYPHS
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, glyph)| *glyph)
            .unwrap_or(' ')
    }

    pub fn all() -> impl Iterator<Item = TileKind> {
        GLYPHS.iter().map(|(kind, _)| *kind)
    }

    pub fn is_enemy(self) -> bool {
        matches!(
            self,
            TileKind::Goblin
                | TileKind::Skeleton
                | TileKind::Biter
                | TileKind::Chicken
                | TileKind::Devil
                | TileKind::SnowBeast
                | TileKind::Beholder
        )
    }

    /// Kinds the player collides with after a move or a simulation step.
    pub fn is_collision(self) -> bool {
        self.is_enemy() || self == TileKind::Trap
    }

    pub fn blocks_player(self) -> bool {
        matches!(
            self,
            TileKind::Wall
                | TileKind::Tree
                | TileKind::Grave1
                | TileKind::Grave2
                | TileKind::CaveWall
                | TileKind::Water
                | TileKind::Snow
                | TileKind::SnowTree
                | TileKind::Stone
        )
    }

    /// Damage-on-contact kinds: standing on or walking into them costs HP.
    pub fn damages_on_contact(self) -> bool {
        matches!(self, TileKind::Lava | TileKind::Slime | TileKind::Ice)
    }

    /// Kinds a blast leaves standing.
    pub fn is_indestructible(self) -> bool {
        matches!(
            self,
            TileKind::Key
                | TileKind::BossKey
                | TileKind::Door
                | TileKind::BossDoor
                | TileKind::ExitKey
                | TileKind::Teleport1
                | TileKind::Teleport2
                | TileKind::Water
                | TileKind::Beach
                | TileKind::Well
        )
    }

    /// What a burnt-out brazier turns this kind into, if it melts at all.
    pub fn melted(self) -> Option<TileKind> {
        match self {
            TileKind::Snow => Some(TileKind::Ice),
            TileKind::Ice => Some(TileKind::Empty),
            _ => None,
        }
    }

    /// Successor written when the player steps onto a swappable kind.
    pub fn swapped(self) -> Option<TileKind> {
        match self {
            TileKind::SecretWall => Some(TileKind::Empty),
            TileKind::Bomb => Some(TileKind::BombLit),
            TileKind::Brazier => Some(TileKind::BrazierLit),
            TileKind::PinkPotion => Some(TileKind::Kitty),
            TileKind::BluePotion => Some(TileKind::Lightning),
            _ => None,
        }
    }

    pub fn is_teleport(self) -> bool {
        matches!(
            self,
            TileKind::Teleport1
                | TileKind::Teleport2
                | TileKind::Well
                | TileKind::FrostTree
                | TileKind::ChaosPortal
        )
    }
}
