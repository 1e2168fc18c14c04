// src/engine/icons.rs
//! Energy icon tokens → canonical one-character type labels.
//!
//! Every source spells its icons differently (style class, image file name,
//! single-letter API code), so each keeps its own table. Unknown tokens never
//! fail: they come back as `[token]`.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnergyType {
    Grass,
    Fire,
    Water,
    Lightning,
    Psychic,
    Fighting,
    Darkness,
    Metal,
    Dragon,
    Colorless,
    Fairy,
}

impl EnergyType {
    pub fn label(&self) -> &'static str {
        match self {
            EnergyType::Grass => "草",
            EnergyType::Fire => "炎",
            EnergyType::Water => "水",
            EnergyType::Lightning => "雷",
            EnergyType::Psychic => "超",
            EnergyType::Fighting => "闘",
            EnergyType::Darkness => "悪",
            EnergyType::Metal => "鋼",
            EnergyType::Dragon => "竜",
            EnergyType::Colorless => "無",
            EnergyType::Fairy => "妖",
        }
    }
}

pub struct IconTable {
    pub name: &'static str,
    pub entries: &'static [(&'static str, EnergyType)],
    /// Compare tokens case-insensitively (API letter codes).
    pub fold_case: bool,
}

impl IconTable {
    pub fn lookup(&self, token: &str) -> Option<EnergyType> {
        let token = token.trim();
        self.entries
            .iter()
            .find(|(k, _)| if self.fold_case { k.eq_ignore_ascii_case(token) } else { *k == token })
            .map(|(_, t)| *t)
    }

    pub fn is_known(&self, token: &str) -> bool {
        self.lookup(token).is_some()
    }

    /// Label for storage in cost / weakness / retreat lists.
    pub fn translate(&self, token: &str) -> String {
        match self.lookup(token) {
            Some(t) => s!(t.label()),
            None => placeholder(token),
        }
    }

    /// Label for running text: `【草】`, or `[token]` when unknown.
    pub fn inline(&self, token: &str) -> String {
        match self.lookup(token) {
            Some(t) => join!("【", t.label(), "】"),
            None => placeholder(token),
        }
    }
}

pub fn placeholder(token: &str) -> String {
    join!("[", token.trim(), "]")
}

use EnergyType::*;

/// Style classes on `span.icon` elements.
pub static JP_ICONS: IconTable = IconTable {
    name: "jp",
    fold_case: false,
    entries: &[
        ("icon-grass", Grass),
        ("icon-fire", Fire),
        ("icon-water", Water),
        ("icon-lightning", Lightning),
        ("icon-electric", Lightning),
        ("icon-psychic", Psychic),
        ("icon-fighting", Fighting),
        ("icon-dark", Darkness),
        ("icon-metal", Metal),
        ("icon-steel", Metal),
        ("icon-dragon", Dragon),
        ("icon-colorless", Colorless),
        ("icon-none", Colorless),
        ("icon-fairy", Fairy),
    ],
};

/// Image file names of `<img>` icons.
pub static CHT_ICONS: IconTable = IconTable {
    name: "cht",
    fold_case: false,
    entries: &[
        ("Grass.png", Grass),
        ("Fire.png", Fire),
        ("Water.png", Water),
        ("Lightning.png", Lightning),
        ("Psychic.png", Psychic),
        ("Fighting.png", Fighting),
        ("Darkness.png", Darkness),
        ("Metal.png", Metal),
        ("Dragon.png", Dragon),
        ("Fairy.png", Fairy),
        ("Colorless.png", Colorless),
    ],
};

/// Single-letter API codes.
pub static CHS_ICONS: IconTable = IconTable {
    name: "chs",
    fold_case: true,
    entries: &[
        ("g", Grass),
        ("r", Fire),
        ("w", Water),
        ("l", Lightning),
        ("p", Psychic),
        ("f", Fighting),
        ("d", Darkness),
        ("m", Metal),
        ("n", Dragon),
        ("c", Colorless),
        ("y", Fairy),
    ],
};
