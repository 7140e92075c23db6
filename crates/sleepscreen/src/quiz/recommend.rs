//! Localized lifestyle recommendations keyed by risk category.

use serde::{Deserialize, Serialize};

use super::flags::DEFAULT_LOCALE;
use super::scoring::CategoryScore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub category_code: String,
    /// Lower is more pressing; follows the ranking of the risks that
    /// produced it.
    pub priority: u8,
    pub title: String,
    pub description: String,
    pub action_items: Vec<String>,
}

struct RecommendationTemplate {
    category_code: &'static str,
    locale: &'static str,
    title: &'static str,
    description: &'static str,
    action_items: &'static [&'static str],
}

/// Builds one recommendation per top risk, ordered by risk rank. A category
/// without a template for the requested locale falls back to the default
/// locale; a category with no template at all is skipped.
pub fn recommendations_for(top_risks: &[CategoryScore], locale: &str) -> Vec<Recommendation> {
    top_risks
        .iter()
        .enumerate()
        .filter_map(|(rank, risk)| {
            let template = template_for(&risk.category_code, locale)
                .or_else(|| template_for(&risk.category_code, DEFAULT_LOCALE))?;
            Some(Recommendation {
                category_code: risk.category_code.clone(),
                priority: rank as u8 + 1,
                title: template.title.to_string(),
                description: template.description.to_string(),
                action_items: template
                    .action_items
                    .iter()
                    .map(|item| item.to_string())
                    .collect(),
            })
        })
        .collect()
}

fn template_for(category_code: &str, locale: &str) -> Option<&'static RecommendationTemplate> {
    TEMPLATES
        .iter()
        .find(|template| template.category_code == category_code && template.locale == locale)
}

static TEMPLATES: &[RecommendationTemplate] = &[
    RecommendationTemplate {
        category_code: "R1_STRESS_PSYCH",
        locale: "en",
        title: "Calm your mind before bed",
        description: "Stress and anxious thoughts are a leading driver of poor sleep.",
        action_items: &[
            "Try a 10-minute breathing or relaxation exercise before bed",
            "Keep a worry journal to park racing thoughts",
            "Avoid stimulating content in the last hour of the day",
        ],
    },
    RecommendationTemplate {
        category_code: "R1_STRESS_PSYCH",
        locale: "ro",
        title: "Calmați-vă mintea înainte de culcare",
        description: "Stresul și gândurile anxioase sunt o cauză principală a somnului prost.",
        action_items: &[
            "Încercați un exercițiu de respirație sau relaxare de 10 minute înainte de culcare",
            "Țineți un jurnal al grijilor pentru a opri gândurile insistente",
            "Evitați conținutul stimulant în ultima oră a zilei",
        ],
    },
    RecommendationTemplate {
        category_code: "R2_SLEEP_DISORDERS",
        locale: "en",
        title: "Get your sleep symptoms evaluated",
        description: "Snoring, breathing pauses, or restless legs can signal a treatable sleep disorder.",
        action_items: &[
            "Book an appointment with a sleep specialist",
            "Ask a partner to note snoring or breathing pauses",
            "Try sleeping on your side rather than your back",
        ],
    },
    RecommendationTemplate {
        category_code: "R2_SLEEP_DISORDERS",
        locale: "ro",
        title: "Evaluați-vă simptomele de somn",
        description: "Sforăitul, pauzele de respirație sau picioarele neliniștite pot semnala o tulburare tratabilă.",
        action_items: &[
            "Programați o consultație la un specialist în somn",
            "Rugați partenerul să observe sforăitul sau pauzele de respirație",
            "Încercați să dormiți pe o parte, nu pe spate",
        ],
    },
    RecommendationTemplate {
        category_code: "R3_LIFESTYLE",
        locale: "en",
        title: "Rework your evening routine",
        description: "Screens and stimulating habits late in the day delay sleep onset.",
        action_items: &[
            "Stop screen use 60 minutes before bed",
            "Reserve the bed for sleep only",
            "Turn the clock away from the bed",
        ],
    },
    RecommendationTemplate {
        category_code: "R3_LIFESTYLE",
        locale: "ro",
        title: "Reorganizați-vă rutina de seară",
        description: "Ecranele și obiceiurile stimulante seara întârzie adormirea.",
        action_items: &[
            "Opriți ecranele cu 60 de minute înainte de culcare",
            "Rezervați patul doar pentru somn",
            "Întoarceți ceasul cu fața de la pat",
        ],
    },
    RecommendationTemplate {
        category_code: "R4_ENVIRONMENT",
        locale: "en",
        title: "Optimize your bedroom",
        description: "Temperature, light, and noise all shape sleep depth.",
        action_items: &[
            "Keep the bedroom between 16-19°C",
            "Use blackout curtains or an eye mask",
            "Consider earplugs or white noise for a noisy room",
        ],
    },
    RecommendationTemplate {
        category_code: "R4_ENVIRONMENT",
        locale: "ro",
        title: "Optimizați-vă dormitorul",
        description: "Temperatura, lumina și zgomotul influențează profunzimea somnului.",
        action_items: &[
            "Mențineți dormitorul între 16-19°C",
            "Folosiți draperii opace sau o mască de ochi",
            "Luați în considerare dopuri de urechi sau zgomot alb",
        ],
    },
    RecommendationTemplate {
        category_code: "R5_HEALTH",
        locale: "en",
        title: "Address underlying health issues",
        description: "Pain and other medical conditions fragment sleep.",
        action_items: &[
            "Review sleep-disrupting symptoms with your doctor",
            "Time pain medication so it covers the night",
        ],
    },
    RecommendationTemplate {
        category_code: "R5_HEALTH",
        locale: "ro",
        title: "Adresați problemele de sănătate",
        description: "Durerea și alte afecțiuni medicale fragmentează somnul.",
        action_items: &[
            "Discutați simptomele care perturbă somnul cu medicul",
            "Programați medicația pentru durere astfel încât să acopere noaptea",
        ],
    },
    RecommendationTemplate {
        category_code: "R6_SUBSTANCES",
        locale: "en",
        title: "Audit caffeine, alcohol, and medication",
        description: "Substances taken late in the day commonly disturb sleep architecture.",
        action_items: &[
            "No caffeine after noon",
            "Avoid alcohol within 3 hours of bedtime",
            "Review long-running sleep medication with a doctor",
        ],
    },
    RecommendationTemplate {
        category_code: "R6_SUBSTANCES",
        locale: "ro",
        title: "Verificați cofeina, alcoolul și medicamentele",
        description: "Substanțele consumate târziu perturbă frecvent arhitectura somnului.",
        action_items: &[
            "Fără cofeină după prânz",
            "Evitați alcoolul cu 3 ore înainte de culcare",
            "Discutați cu un medic medicamentele pentru somn luate pe termen lung",
        ],
    },
    RecommendationTemplate {
        category_code: "R7_CIRCADIAN",
        locale: "en",
        title: "Stabilize your sleep schedule",
        description: "An inconsistent schedule works against your body clock.",
        action_items: &[
            "Wake at the same time every day, including weekends",
            "Get bright light soon after waking",
            "For shift work, keep the same sleep window across days off",
        ],
    },
    RecommendationTemplate {
        category_code: "R7_CIRCADIAN",
        locale: "ro",
        title: "Stabilizați-vă programul de somn",
        description: "Un program inconsecvent lucrează împotriva ceasului biologic.",
        action_items: &[
            "Treziți-vă la aceeași oră în fiecare zi, inclusiv în weekend",
            "Expuneți-vă la lumină puternică imediat după trezire",
            "În munca în schimburi, păstrați aceeași fereastră de somn și în zilele libere",
        ],
    },
    RecommendationTemplate {
        category_code: "R8_HORMONAL",
        locale: "en",
        title: "Manage hormonal sleep disruption",
        description: "Hormonal transitions commonly disturb sleep and respond to targeted support.",
        action_items: &[
            "Discuss symptoms with your doctor or a specialist",
            "Keep the bedroom cool to reduce night sweats",
        ],
    },
    RecommendationTemplate {
        category_code: "R8_HORMONAL",
        locale: "ro",
        title: "Gestionați perturbările hormonale ale somnului",
        description: "Tranzițiile hormonale perturbă frecvent somnul și răspund la sprijin țintit.",
        action_items: &[
            "Discutați simptomele cu medicul sau un specialist",
            "Mențineți dormitorul răcoros pentru a reduce transpirațiile nocturne",
        ],
    },
    RecommendationTemplate {
        category_code: "R9_DIGESTIVE",
        locale: "en",
        title: "Reduce night-time reflux",
        description: "Acid reflux while lying down fragments sleep.",
        action_items: &[
            "Finish the last meal 3 hours before bed",
            "Raise the head of the bed slightly",
        ],
    },
    RecommendationTemplate {
        category_code: "R9_DIGESTIVE",
        locale: "ro",
        title: "Reduceți refluxul nocturn",
        description: "Refluxul acid în poziție culcată fragmentează somnul.",
        action_items: &[
            "Luați ultima masă cu 3 ore înainte de culcare",
            "Ridicați ușor capul patului",
        ],
    },
    RecommendationTemplate {
        category_code: "R10_RESPIRATORY",
        locale: "en",
        title: "Breathe easier at night",
        description: "Nasal congestion forces mouth breathing and lighter sleep.",
        action_items: &[
            "Try a saline rinse before bed",
            "See a doctor about chronic congestion",
        ],
    },
    RecommendationTemplate {
        category_code: "R10_RESPIRATORY",
        locale: "ro",
        title: "Respirați mai ușor noaptea",
        description: "Congestia nazală forțează respirația pe gură și un somn mai superficial.",
        action_items: &[
            "Încercați o spălare cu soluție salină înainte de culcare",
            "Consultați un medic pentru congestia cronică",
        ],
    },
    RecommendationTemplate {
        category_code: "R11_PAIN",
        locale: "en",
        title: "Ease pain before sleep",
        description: "Morning headaches and night pain point at problems worth treating.",
        action_items: &[
            "Mention morning headaches to your doctor",
            "Experiment with pillow and mattress support",
        ],
    },
    RecommendationTemplate {
        category_code: "R11_PAIN",
        locale: "ro",
        title: "Atenuați durerea înainte de somn",
        description: "Durerile de cap matinale și durerea nocturnă indică probleme care merită tratate.",
        action_items: &[
            "Menționați durerile de cap matinale medicului",
            "Experimentați cu perna și suportul saltelei",
        ],
    },
    RecommendationTemplate {
        category_code: "R12_NEUROLOGICAL",
        locale: "en",
        title: "Settle disruptive dreaming",
        description: "Frequent nightmares and intense dreams disturb restorative sleep.",
        action_items: &[
            "Wind down with a calm routine before bed",
            "Discuss persistent nightmares with a professional",
        ],
    },
    RecommendationTemplate {
        category_code: "R12_NEUROLOGICAL",
        locale: "ro",
        title: "Liniștiți visele perturbatoare",
        description: "Coșmarurile frecvente și visele intense perturbă somnul odihnitor.",
        action_items: &[
            "Relaxați-vă cu o rutină calmă înainte de culcare",
            "Discutați coșmarurile persistente cu un specialist",
        ],
    },
    RecommendationTemplate {
        category_code: "R13_EXTERNAL",
        locale: "en",
        title: "Contain external disruptions",
        description: "Partners, pets, and children are fixable sources of broken sleep.",
        action_items: &[
            "Encourage a snoring partner to get evaluated",
            "Move pets out of the bedroom for a trial week",
            "Alternate night duty for young children where possible",
        ],
    },
    RecommendationTemplate {
        category_code: "R13_EXTERNAL",
        locale: "ro",
        title: "Limitați perturbările externe",
        description: "Partenerii, animalele și copiii sunt surse remediabile de somn întrerupt.",
        action_items: &[
            "Încurajați partenerul care sforăie să facă o evaluare",
            "Mutați animalele din dormitor pentru o săptămână de probă",
            "Alternați tura de noapte pentru copiii mici, unde este posibil",
        ],
    },
    RecommendationTemplate {
        category_code: "R14_SLEEP_HABITS",
        locale: "en",
        title: "Retrain light sleep",
        description: "Hypervigilance and light sleep respond well to consistent conditioning.",
        action_items: &[
            "Use steady background noise to mask startling sounds",
            "Keep a fixed pre-sleep ritual to cue the body",
        ],
    },
    RecommendationTemplate {
        category_code: "R14_SLEEP_HABITS",
        locale: "ro",
        title: "Reantrenați somnul superficial",
        description: "Hipervigilența și somnul superficial răspund bine la condiționare constantă.",
        action_items: &[
            "Folosiți zgomot de fundal constant pentru a masca sunetele bruște",
            "Păstrați un ritual fix înainte de somn pentru a pregăti corpul",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::scoring::RiskLevel;

    fn risk(code: &str, percentage: u32) -> CategoryScore {
        CategoryScore {
            category_code: code.to_string(),
            category_name: code.to_string(),
            raw_score: 5,
            max_possible: 10,
            normalized_score: 0.5,
            percentage,
            risk_level: RiskLevel::Moderate,
        }
    }

    #[test]
    fn ordered_by_risk_rank_with_locale_fallback() {
        let risks = vec![risk("R2_SLEEP_DISORDERS", 80), risk("R6_SUBSTANCES", 40)];
        let recommendations = recommendations_for(&risks, "de");
        assert_eq!(recommendations.len(), 2);
        assert_eq!(recommendations[0].category_code, "R2_SLEEP_DISORDERS");
        assert_eq!(recommendations[0].priority, 1);
        assert_eq!(recommendations[1].priority, 2);
        // unknown locale falls back to English
        assert_eq!(recommendations[0].title, "Get your sleep symptoms evaluated");
    }

    #[test]
    fn unknown_category_is_skipped() {
        let risks = vec![risk("R99_UNKNOWN", 80), risk("R1_STRESS_PSYCH", 60)];
        let recommendations = recommendations_for(&risks, "ro");
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].category_code, "R1_STRESS_PSYCH");
        assert_eq!(recommendations[0].priority, 2);
    }
}
