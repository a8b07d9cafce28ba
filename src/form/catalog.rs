//! Static option lists for the select fields of the form

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> SelectOption {
    SelectOption { value, label }
}

pub const LOCATIONS: &[SelectOption] = &[
    opt("berlin", "Berlin"),
    opt("braunschweig", "Braunschweig"),
    opt("bremen", "Bremen"),
    opt("bremerhaven", "Bremerhaven"),
    opt("cottbus", "Cottbus"),
    opt("dresden", "Dresden"),
    opt("duesseldorf", "Düsseldorf"),
    opt("erfurt", "Erfurt"),
    opt("frankfurt-am-main", "Frankfurt am Main"),
    opt("halle-saale", "Halle (Saale)"),
    opt("hamburg", "Hamburg"),
    opt("hannover", "Hannover"),
    opt("jena", "Jena"),
    opt("karlsruhe", "Karlsruhe"),
    opt("kiel", "Kiel"),
    opt("koeln", "Köln"),
    opt("leipzig", "Leipzig"),
    opt("luebeck", "Lübeck"),
    opt("ludwigshafen-am-rhein", "Ludwigshafen am Rhein"),
    opt("magdeburg", "Magdeburg"),
    opt("mainz", "Mainz"),
    opt("munich", "München"),
    opt("neunkirchen", "Neunkirchen"),
    opt("nuernberg", "Nürnberg"),
    opt("potsdam", "Potsdam"),
    opt("rostock", "Rostock"),
    opt("saarbruecken", "Saarbrücken"),
    opt("schwerin", "Schwerin"),
    opt("stuttgart", "Stuttgart"),
    opt("wiesbaden", "Wiesbaden"),
];

pub const JOB_SITES: &[SelectOption] = &[opt("StepStone", "StepStone"), opt("Xing", "Xing")];

pub const DISCIPLINES: &[SelectOption] = &[
    opt("IT", "IT"),
    opt("Marketing", "Marketing"),
    opt("Vertrieb und Verkauf", "Vertrieb und Verkauf"),
    opt("Medien", "Medien"),
    opt("Bildung", "Bildung"),
    opt("Beratung", "Beratung"),
    opt("Management", "Management"),
    opt("Administration", "Administration"),
    opt("Personal", "Personal"),
    opt("Buchhaltung", "Buchhaltung"),
    opt("Ingenieurwesen", "Ingenieurwesen"),
    opt("Kundenservice", "Kundenservice"),
    opt("Finanzen", "Finanzen"),
    opt("Logistik", "Logistik"),
    opt("Wissenschaften", "Wissenschaften"),
    opt("Bauwesen", "Bauwesen"),
    opt("Banken", "Banken"),
    opt("Gastronomie, Hotellerie", "Gastronomie, Hotellerie"),
    opt("Gesundheit", "Gesundheit"),
    opt("Groß- und Einzelhandel", "Groß- und Einzelhandel"),
];

pub const RADIUS_MAX_KM: u32 = 100;
pub const RADIUS_STEP_KM: u32 = 10;

pub fn find(options: &'static [SelectOption], value: &str) -> Option<&'static SelectOption> {
    options.iter().find(|o| o.value == value)
}

/// Label of a city value, for display next to the radius
pub fn location_label(value: &str) -> Option<&'static str> {
    find(LOCATIONS, value).map(|o| o.label)
}
