use crate::models::Language;

/// User-facing strings for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub day: &'static str,
    pub meal: &'static str,
    pub protein: &'static str,
    pub carbs: &'static str,
    pub fat: &'static str,
    pub days_unit: &'static str,
    pub per_day: &'static str,
    pub effective: &'static str,
    pub targets: &'static str,
    pub shopping: &'static str,
    pub item: &'static str,
    pub portions: &'static str,
    pub swaps: &'static str,
    pub macros_error: &'static str,
    pub tip: &'static str,
}

const EN: Labels = Labels {
    day: "Day",
    meal: "Meal",
    protein: "P",
    carbs: "C",
    fat: "F",
    days_unit: "days",
    per_day: "kcal/day",
    effective: "effective",
    targets: "Macro targets",
    shopping: "Shopping list (by portions)",
    item: "Item",
    portions: "Portions",
    swaps: "Swap ideas",
    macros_error: "Protein % + Carbs % must be <= 100.",
    tip: "Portions are approximate; adjust slightly to hit exact calories/macros.",
};

const SR: Labels = Labels {
    day: "Dan",
    meal: "Obrok",
    protein: "P",
    carbs: "UH",
    fat: "M",
    days_unit: "dana",
    per_day: "kcal/dan",
    effective: "efektivno",
    targets: "Ciljni makroi",
    shopping: "Lista za kupovinu (po porcijama)",
    item: "Namirnica",
    portions: "Porcije",
    swaps: "Zamene",
    macros_error: "Zbir Proteini% + UH% mora biti <= 100.",
    tip: "Porcije su okvirne; prilagodi ih da pogodiš tačne kalorije i makroe.",
};

pub fn labels(lang: Language) -> &'static Labels {
    match lang {
        Language::En => &EN,
        Language::Sr => &SR,
    }
}
