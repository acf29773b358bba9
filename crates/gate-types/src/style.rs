use serde::{Deserialize, Serialize};

/// A closed set of choices for one style field of a [`GateSpec`](crate::GateSpec).
///
/// Every implementor has an explicit default variant that unknown or missing
/// labels resolve to, so lookups never fail.
pub trait StyleOption: Copy + Default + PartialEq + 'static {
    /// Wire key of the field this option is read from.
    const KEY: &'static str;
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.label().eq_ignore_ascii_case(label))
            .unwrap_or_default()
    }

    /// Like [`from_label`](Self::from_label) but reports whether the label was known.
    fn parse_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.label().eq_ignore_ascii_case(label))
    }
}

macro_rules! style_option {
    (
        $(#[$meta:meta])*
        $name:ident, key = $key:literal,
        { $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl StyleOption for $name {
            const KEY: &'static str = $key;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }
    };
}

style_option! {
    /// The four gate families.
    GateType, key = "Typ bramy",
    {
        #[default]
        Sectional => "Brama segmentowa",
        Roller => "Brama roletowa",
        TiltUp => "Brama uchylna",
        Swing => "Brama rozwierana",
    }
}

style_option! {
    /// Panel embossing / board pattern.
    FillPattern, key = "Przetłoczenia",
    {
        #[default]
        Start => "START",
        Plain => "Bez przetłoczeń",
        LowRib => "Niskie przetłoczenia",
        HighRib => "Wysokie przetłoczenia",
        Caisson => "Kasetony",
        VerticalBoards => "Pionowe deski",
        HorizontalBoards => "Poziome deski",
    }
}

style_option! {
    /// Roller slat profile height.
    ProfileHeight, key = "Wysokość profili",
    {
        #[default]
        Start => "START",
        Mm77 => "77 mm",
        Mm100 => "100 mm",
    }
}

style_option! {
    /// Leaf configuration of a swing gate.
    LeafCount, key = "Ilość skrzydeł",
    {
        #[default]
        Start => "START",
        SingleRight => "Jednoskrzydłowa prawa",
        SingleLeft => "Jednoskrzydłowa lewa",
        Double => "Dwuskrzydłowa",
    }
}

style_option! {
    HandleStyle, key = "Klamka",
    {
        /// No handle chosen.
        #[default]
        Start => "START",
        Standard => "Klamka standardowa",
        Escutcheon => "Klamka z szyldem",
        Grip => "Uchwyt",
    }
}

style_option! {
    /// One entry of the `Dodatki` list.
    AccessoryKind, key = "Dodatki",
    {
        #[default]
        Start => "START",
        Rails => "Szyny",
        Windows => "Okna",
        Vents => "Kratki wentylacyjne",
        PassDoor => "Drzwi przejściowe",
    }
}

/// Which optional accessories a gate carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorySelection {
    pub rails: bool,
    pub windows: bool,
    pub vents: bool,
    pub pass_door: bool,
}

impl AccessorySelection {
    pub fn from_kinds(kinds: impl IntoIterator<Item = AccessoryKind>) -> Self {
        let mut selection = Self::default();
        for kind in kinds {
            match kind {
                AccessoryKind::Rails => selection.rails = true,
                AccessoryKind::Windows => selection.windows = true,
                AccessoryKind::Vents => selection.vents = true,
                AccessoryKind::PassDoor => selection.pass_door = true,
                AccessoryKind::Start => {}
            }
        }
        selection
    }

    pub fn kinds(&self) -> Vec<AccessoryKind> {
        let mut kinds = Vec::new();
        if self.rails {
            kinds.push(AccessoryKind::Rails);
        }
        if self.windows {
            kinds.push(AccessoryKind::Windows);
        }
        if self.vents {
            kinds.push(AccessoryKind::Vents);
        }
        if self.pass_door {
            kinds.push(AccessoryKind::PassDoor);
        }
        kinds
    }

    pub fn is_empty(&self) -> bool {
        self.kinds().is_empty()
    }
}
