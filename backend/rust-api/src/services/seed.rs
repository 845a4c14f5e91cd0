//! Built-in sample questions, loaded once at startup when the bank is
//! empty. Bulk import of the full catalogue happens outside this service.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{Difficulty, LocalizedList, LocalizedText, Question, QuestionType};
use crate::services::question_store::QuestionStore;

fn text(de: &str, en: &str, tr: &str) -> LocalizedText {
    LocalizedText(BTreeMap::from([
        ("de".to_string(), de.to_string()),
        ("en".to_string(), en.to_string()),
        ("tr".to_string(), tr.to_string()),
    ]))
}

fn options(de: &[&str], en: &[&str], tr: &[&str]) -> LocalizedList {
    LocalizedList(BTreeMap::from([
        ("de".to_string(), de.iter().map(|s| s.to_string()).collect()),
        ("en".to_string(), en.iter().map(|s| s.to_string()).collect()),
        ("tr".to_string(), tr.iter().map(|s| s.to_string()).collect()),
    ]))
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

pub fn sample_questions() -> Vec<Question> {
    vec![
        Question {
            id: "001".to_string(),
            question: text(
                "Welche Unterlagen müssen bei einer Kontrolle mitgeführt werden?",
                "Which documents must be carried during an inspection?",
                "Kontrol sırasında hangi belgeler taşınmalıdır?",
            ),
            kind: QuestionType::Single,
            options: options(
                &[
                    "Führerschein, Fahrzeugpapiere, Mietvertrag",
                    "Fahrzeugschein, Versicherungspolice, Personalausweis",
                    "Führerschein, Fahrzeugschein, Genehmigungsurkunde",
                ],
                &[
                    "Driver's license, vehicle documents, rental contract",
                    "Registration certificate, insurance policy, ID card",
                    "Driver's license, registration certificate, license certificate",
                ],
                &[
                    "Ehliyet, araç evrakları, kiralama sözleşmesi",
                    "Ruhsat, sigorta poliçesi, kimlik kartı",
                    "Ehliyet, ruhsat, ruhsat belgesi",
                ],
            ),
            correct_answer: vec![2],
            explanation: text(
                "Im Taxi- und Mietwagenverkehr sind Führerschein, Fahrzeugschein und Genehmigungsurkunde mitzuführen.",
                "In taxi and rental car transport, driver's license, registration certificate, and license certificate must be carried.",
                "Taksi ve kiralık araç taşımacılığında ehliyet, ruhsat ve ruhsat belgesi taşınmalıdır.",
            ),
            topic: "Recht".to_string(),
            difficulty: Difficulty::Easy,
            image: None,
            tags: tags(&["kontrolle", "dokumente", "pflicht"]),
        },
        Question {
            id: "002".to_string(),
            question: text(
                "Wie hoch ist die Mindestversicherungssumme für Personenschäden?",
                "What is the minimum insurance amount for personal injury?",
                "Kişisel yaralanma için minimum sigorta tutarı nedir?",
            ),
            kind: QuestionType::Single,
            options: options(
                &["7,5 Millionen Euro", "10 Millionen Euro", "15 Millionen Euro"],
                &["7.5 million euros", "10 million euros", "15 million euros"],
                &["7,5 milyon euro", "10 milyon euro", "15 milyon euro"],
            ),
            correct_answer: vec![0],
            explanation: text(
                "Die Mindestversicherungssumme für Personenschäden beträgt 7,5 Millionen Euro.",
                "The minimum insurance amount for personal injury is 7.5 million euros.",
                "Kişisel yaralanma için minimum sigorta tutarı 7,5 milyon euro'dur.",
            ),
            topic: "Recht".to_string(),
            difficulty: Difficulty::Medium,
            image: None,
            tags: tags(&["versicherung"]),
        },
        Question {
            id: "003".to_string(),
            question: text(
                "Was gehört zur kaufmännischen Buchführung?",
                "What belongs to commercial bookkeeping?",
                "Ticari defter tutmaya neler dahildir?",
            ),
            kind: QuestionType::Multiple,
            options: options(
                &[
                    "Eingangsrechnungen erfassen",
                    "Ausgangsrechnungen erstellen",
                    "Kassenbuch führen",
                    "Fahrzeug waschen",
                ],
                &[
                    "Recording incoming invoices",
                    "Issuing outgoing invoices",
                    "Keeping a cash book",
                    "Washing the vehicle",
                ],
                &[
                    "Gelen faturaları kaydetmek",
                    "Giden faturaları düzenlemek",
                    "Kasa defteri tutmak",
                    "Aracı yıkamak",
                ],
            ),
            correct_answer: vec![0, 1, 2],
            explanation: text(
                "Zur kaufmännischen Buchführung gehören alle Geschäftsvorgänge wie Rechnungen und Kassenführung.",
                "Commercial bookkeeping covers all business transactions such as invoices and cash management.",
                "Ticari defter tutma, faturalar ve kasa yönetimi gibi tüm iş işlemlerini kapsar.",
            ),
            topic: "Kaufmännische & finanzielle Führung".to_string(),
            difficulty: Difficulty::Medium,
            image: None,
            tags: tags(&["buchführung"]),
        },
        Question {
            id: "004".to_string(),
            question: text(
                "Welche technischen Prüfungen sind für Taxen vorgeschrieben?",
                "Which technical inspections are mandatory for taxis?",
                "Taksiler için hangi teknik muayeneler zorunludur?",
            ),
            kind: QuestionType::Single,
            options: options(
                &[
                    "Nur TÜV alle 2 Jahre",
                    "TÜV jährlich und Taxameter-Eichung alle 2 Jahre",
                    "Nur Taxameter-Eichung jährlich",
                ],
                &[
                    "Only TÜV every 2 years",
                    "TÜV annually and taximeter calibration every 2 years",
                    "Only taximeter calibration annually",
                ],
                &[
                    "Sadece 2 yılda bir TÜV",
                    "Yıllık TÜV ve 2 yılda bir taksimetre kalibrasyonu",
                    "Sadece yıllık taksimetre kalibrasyonu",
                ],
            ),
            correct_answer: vec![1],
            explanation: text(
                "Taxen müssen jährlich zum TÜV und alle 2 Jahre zur Taxameter-Eichung.",
                "Taxis must undergo TÜV annually and taximeter calibration every 2 years.",
                "Taksiler yılda bir TÜV'e, 2 yılda bir taksimetre kalibrasyonuna girmelidir.",
            ),
            topic: "Technische Normen & Betrieb".to_string(),
            difficulty: Difficulty::Hard,
            image: None,
            tags: tags(&["tüv", "taxameter"]),
        },
        Question {
            id: "006".to_string(),
            question: text(
                "Was ist bei grenzüberschreitenden Fahrten zu beachten?",
                "What must be considered for cross-border trips?",
                "Sınır ötesi yolculuklarda nelere dikkat edilmelidir?",
            ),
            kind: QuestionType::Multiple,
            options: options(
                &[
                    "Genehmigung für das Zielland",
                    "Gültige Versicherung im Ausland",
                    "Mehrsprachige Fahrzeugpapiere",
                    "Internationaler Führerschein",
                ],
                &[
                    "Permit for the destination country",
                    "Valid insurance abroad",
                    "Multilingual vehicle documents",
                    "International driver's license",
                ],
                &[
                    "Hedef ülke için izin",
                    "Yurt dışında geçerli sigorta",
                    "Çok dilli araç belgeleri",
                    "Uluslararası ehliyet",
                ],
            ),
            correct_answer: vec![0, 1, 3],
            explanation: text(
                "Bei grenzüberschreitenden Fahrten sind Genehmigungen, Versicherungsschutz und internationaler Führerschein wichtig.",
                "For cross-border trips, permits, insurance coverage, and an international driver's license are important.",
                "Sınır ötesi yolculuklar için izinler, sigorta kapsamı ve uluslararası ehliyet önemlidir.",
            ),
            topic: "Grenzüberschreitender Personenverkehr".to_string(),
            difficulty: Difficulty::Hard,
            image: None,
            tags: tags(&["ausland", "genehmigung"]),
        },
        Question {
            id: "009".to_string(),
            question: text(
                "Erläutern Sie, welche Pflichten ein Unternehmer bei der Betriebsaufnahme hat.",
                "Explain the obligations of an operator when starting the business.",
                "Bir işletmecinin faaliyete başlarken hangi yükümlülükleri olduğunu açıklayın.",
            ),
            kind: QuestionType::Open,
            options: LocalizedList::default(),
            correct_answer: vec![],
            explanation: text(
                "Unter anderem Genehmigung, Anmeldung beim Gewerbeamt und Nachweis der fachlichen Eignung.",
                "Among others: the permit, registration with the trade office, and proof of professional competence.",
                "Diğerlerinin yanı sıra izin, ticaret dairesine kayıt ve mesleki yeterlilik belgesi.",
            ),
            topic: "Recht".to_string(),
            difficulty: Difficulty::Medium,
            image: None,
            tags: tags(&["betriebsaufnahme"]),
        },
    ]
}

/// Seeds the sample bank when the store has no questions yet. Returns how
/// many were inserted.
pub async fn seed_if_empty(store: &Arc<dyn QuestionStore>) -> Result<usize, ApiError> {
    if !store.is_empty().await? {
        return Ok(0);
    }

    let questions = sample_questions();
    for question in &questions {
        question
            .validate()
            .map_err(|e| ApiError::validation("question", e.to_string()))?;
    }

    let inserted = questions.len();
    store.insert_many(questions).await?;
    tracing::info!("Seeded {} sample questions", inserted);
    Ok(inserted)
}
