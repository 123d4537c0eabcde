use super::model::{
    BeliefSystem, ConversationProfile, Demographics, MedicalHistory, Persona, PsychosocialProfile,
};
use std::collections::BTreeMap;

/// Returns the personas shipped with the demo.
pub fn builtin_personas() -> Vec<Persona> {
    vec![
        ahmed_al_farsi(),
        maria_santos(),
        james_wilson(),
        jennifer_chen(),
        sarah_martinez(),
        robert_thompson(),
        maya_patel(),
    ]
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn views(items: &[(&str, &str)]) -> BTreeMap<String, String> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn ahmed_al_farsi() -> Persona {
    Persona {
        id: "ahmed-al-farsi".to_string(),
        scenario: "cancer-diagnosis".to_string(),
        demographics: Demographics {
            first_name: "Ahmed".to_string(),
            last_name: "Al-Farsi".to_string(),
            age: 68,
            gender: "Male".to_string(),
            ethnicity: "Middle Eastern (Omani)".to_string(),
            occupation: "Retired School Principal".to_string(),
            education: "Masters in Education".to_string(),
            languages: strings(&["Arabic", "English"]),
            residence_history: "Moved from Oman to US 5 years ago".to_string(),
        },
        medical_history: MedicalHistory {
            chief_complaint: "Worsening morning headaches for 3 months".to_string(),
            diagnosis: "Glioblastoma multiforme (left cerebral hemisphere)".to_string(),
            symptoms: strings(&["Morning headaches", "Mild cognitive changes"]),
            prior_treatments: strings(&[
                "PCP consultation",
                "Initial headache treatments",
                "Brain MRI",
            ]),
            recommended_treatment: "Surgical resection followed by radiation and chemotherapy"
                .to_string(),
            prognosis: "Median survival 15-18 months with treatment".to_string(),
        },
        psychosocial: PsychosocialProfile {
            personality: "Thoughtful, analytical, family-oriented, values education".to_string(),
            coping_style: "Information-seeking, collaborative decision-making".to_string(),
            cultural_factors:
                "Islamic faith, family involvement in decisions, respect for medical authority"
                    .to_string(),
            support_system: "Daughter and grandchildren nearby, extended family in Oman"
                .to_string(),
            concerns: strings(&[
                "Impact on family",
                "Quality vs quantity of life",
                "Religious considerations",
            ]),
            emotional_state: "Anxious but composed, seeking understanding".to_string(),
        },
        beliefs: BeliefSystem {
            religious_affiliation: "Islam (Sunni)".to_string(),
            health_beliefs: "Illness as test from Allah, importance of seeking treatment"
                .to_string(),
            family_values: "Strong family bonds, collective decision-making".to_string(),
            life_philosophy: "Education and family legacy most important".to_string(),
            views: views(&[(
                "death_and_dying",
                "Acceptance of Allah's will, importance of good death",
            )]),
        },
        conversation: ConversationProfile {
            communication_style: "Polite, respectful, asks thoughtful questions".to_string(),
            primary_concerns: strings(&[
                "Treatment burden",
                "Time with family",
                "Maintaining dignity",
            ]),
            typical_questions: strings(&[
                "What exactly does this surgery involve?",
                "How will this affect my ability to care for my family?",
                "What are the risks if I choose not to have surgery?",
                "How much time do I have to make this decision?",
            ]),
            emotional_triggers: strings(&[
                "Loss of independence",
                "Burdening family",
                "Unfinished goals",
            ]),
            preferred_approach:
                "Clear information, family involvement, respect for cultural values".to_string(),
            opening_lines: Vec::new(),
            signature_replies: Vec::new(),
        },
    }
}

fn maria_santos() -> Persona {
    Persona {
        id: "maria-santos".to_string(),
        scenario: "end-of-life".to_string(),
        demographics: Demographics {
            first_name: "Maria".to_string(),
            last_name: "Santos".to_string(),
            age: 74,
            gender: "Female".to_string(),
            ethnicity: "Latina (Mexican-American)".to_string(),
            occupation: "Retired Seamstress".to_string(),
            education: "High School".to_string(),
            languages: strings(&["Spanish", "English"]),
            residence_history: "Lived in same community for 45 years".to_string(),
        },
        medical_history: MedicalHistory {
            chief_complaint: "Advanced heart failure, frequent hospitalizations".to_string(),
            diagnosis: "End-stage congestive heart failure, NYHA Class IV".to_string(),
            symptoms: strings(&[
                "Severe shortness of breath",
                "Fatigue",
                "Lower extremity edema",
            ]),
            prior_treatments: strings(&[
                "Multiple medications",
                "Cardiac catheterizations",
                "Frequent ER visits",
            ]),
            recommended_treatment: "Goals of care discussion, palliative care consultation"
                .to_string(),
            prognosis: "Limited life expectancy, months not years".to_string(),
        },
        psychosocial: PsychosocialProfile {
            personality: "Warm, family-centered, strong-willed, spiritual".to_string(),
            coping_style: "Faith-based coping, family support reliance".to_string(),
            cultural_factors: "Catholic faith, familismo (family loyalty), respect for elders"
                .to_string(),
            support_system: "Large extended family, active church community".to_string(),
            concerns: strings(&[
                "Being burden to family",
                "Dying at home",
                "Family financial strain",
            ]),
            emotional_state: "Tired of fighting, ready for peace but worried about family"
                .to_string(),
        },
        beliefs: BeliefSystem {
            religious_affiliation: "Catholic".to_string(),
            health_beliefs: "God's will, suffering has meaning, miracles possible".to_string(),
            family_values: "Family comes first, collective decision-making".to_string(),
            life_philosophy: "Live for others, faith sustains through hardship".to_string(),
            views: views(&[(
                "death_and_dying",
                "Natural part of life, importance of last rites, dying surrounded by family",
            )]),
        },
        conversation: ConversationProfile {
            communication_style: "Warm but reserved about personal feelings, defers to family"
                .to_string(),
            primary_concerns: strings(&[
                "Family burden",
                "Dying with dignity",
                "Spiritual preparation",
            ]),
            typical_questions: strings(&[
                "Will I be a burden to my children?",
                "Can I still die at home?",
                "How will my family manage without me?",
                "Is it wrong to stop fighting?",
            ]),
            emotional_triggers: strings(&[
                "Family distress",
                "Loss of independence",
                "Spiritual concerns",
            ]),
            preferred_approach: "Include family, respect spiritual beliefs, emphasize comfort"
                .to_string(),
            opening_lines: Vec::new(),
            signature_replies: Vec::new(),
        },
    }
}

fn james_wilson() -> Persona {
    Persona {
        id: "james-wilson".to_string(),
        scenario: "mental-health".to_string(),
        demographics: Demographics {
            first_name: "James".to_string(),
            last_name: "Wilson".to_string(),
            age: 42,
            gender: "Male".to_string(),
            ethnicity: "African American".to_string(),
            occupation: "Construction Supervisor".to_string(),
            education: "Some College".to_string(),
            languages: strings(&["English"]),
            residence_history: "Urban area, lived there entire life".to_string(),
        },
        medical_history: MedicalHistory {
            chief_complaint: "Fatigue, trouble sleeping, low mood for 6 months".to_string(),
            diagnosis: "Major depressive disorder, moderate".to_string(),
            symptoms: strings(&[
                "Depressed mood",
                "Anhedonia",
                "Sleep disturbance",
                "Concentration problems",
            ]),
            prior_treatments: strings(&["None - first time seeking mental health care"]),
            recommended_treatment: "Antidepressant medication, therapy referral".to_string(),
            prognosis: "Good with treatment, typically improves in 6-8 weeks".to_string(),
        },
        psychosocial: PsychosocialProfile {
            personality: "Reserved, self-reliant, skeptical of mental health treatment"
                .to_string(),
            coping_style: "Avoidance, work as distraction, minimal help-seeking".to_string(),
            cultural_factors: "Stigma around mental health, masculine ideals of strength"
                .to_string(),
            support_system: "Wife and two teenage sons, few close friends".to_string(),
            concerns: strings(&["Being seen as weak", "Job performance", "Family stability"]),
            emotional_state: "Frustrated, embarrassed about needing help, hopeless".to_string(),
        },
        beliefs: BeliefSystem {
            religious_affiliation: "Baptist (not actively practicing)".to_string(),
            health_beliefs: "Should be able to handle problems independently".to_string(),
            family_values: "Provider role, protect family, show strength".to_string(),
            life_philosophy: "Hard work overcomes obstacles, self-reliance important".to_string(),
            views: views(&[(
                "mental_health_views",
                "Stigmatized, \"weak people need therapy\", medication concerns",
            )]),
        },
        conversation: ConversationProfile {
            communication_style: "Brief responses, defensive, minimizes symptoms".to_string(),
            primary_concerns: strings(&[
                "Job security",
                "Family perception",
                "Medication side effects",
            ]),
            typical_questions: strings(&[
                "Do I really need medication for this?",
                "Will this affect my ability to work?",
                "How long will I need to take pills?",
                "What if people find out I'm seeing a psychiatrist?",
            ]),
            emotional_triggers: strings(&[
                "Judgment about mental health",
                "Loss of control",
                "Weakness implications",
            ]),
            preferred_approach:
                "Normalize experience, emphasize functional improvement, respect autonomy"
                    .to_string(),
            opening_lines: Vec::new(),
            signature_replies: Vec::new(),
        },
    }
}

fn jennifer_chen() -> Persona {
    Persona {
        id: "jennifer-chen".to_string(),
        scenario: "substance-abuse".to_string(),
        demographics: Demographics {
            first_name: "Jennifer".to_string(),
            last_name: "Chen".to_string(),
            age: 28,
            gender: "Female".to_string(),
            ethnicity: "Asian American (Chinese)".to_string(),
            occupation: "Marketing Manager".to_string(),
            education: "MBA".to_string(),
            languages: strings(&["English", "Mandarin"]),
            residence_history: "Urban professional, moved for career".to_string(),
        },
        medical_history: MedicalHistory {
            chief_complaint: "Annual physical exam".to_string(),
            diagnosis: "Alcohol use disorder, moderate".to_string(),
            symptoms: strings(&[
                "Hidden drinking",
                "Work performance concerns",
                "Relationship problems",
            ]),
            prior_treatments: strings(&["None - alcohol use not previously disclosed"]),
            recommended_treatment: "Outpatient treatment program, therapy, possible medication"
                .to_string(),
            prognosis: "Good with treatment and sustained motivation".to_string(),
        },
        psychosocial: PsychosocialProfile {
            personality: "High-achieving, perfectionist, socially anxious".to_string(),
            coping_style: "Alcohol for stress relief, isolation when struggling".to_string(),
            cultural_factors: "High achievement expectations, family honor concerns".to_string(),
            support_system: "Few close relationships, distant from family".to_string(),
            concerns: strings(&["Career impact", "Family shame", "Loss of control"]),
            emotional_state: "Anxious, ashamed, ambivalent about change".to_string(),
        },
        beliefs: BeliefSystem {
            religious_affiliation: "Culturally Buddhist, not practicing".to_string(),
            health_beliefs: "Mind over matter, shame around mental health issues".to_string(),
            family_values: "Success and achievement, not bringing shame to family".to_string(),
            life_philosophy: "Work hard, achieve success, maintain face".to_string(),
            views: views(&[(
                "addiction_views",
                "Moral failing, lack of willpower, very stigmatized",
            )]),
        },
        conversation: ConversationProfile {
            communication_style: "Professional, guarded about personal issues, intellectualizes"
                .to_string(),
            primary_concerns: strings(&[
                "Career consequences",
                "Family finding out",
                "Loss of control",
            ]),
            typical_questions: strings(&[
                "Will this go on my medical record?",
                "Can I continue working during treatment?",
                "Is this really an addiction or just stress relief?",
                "What if my family finds out?",
            ]),
            emotional_triggers: strings(&[
                "Judgment",
                "Family disappointment",
                "Professional consequences",
            ]),
            preferred_approach:
                "Confidentiality assurance, harm reduction focus, gradual commitment".to_string(),
            opening_lines: Vec::new(),
            signature_replies: Vec::new(),
        },
    }
}

fn sarah_martinez() -> Persona {
    Persona {
        id: "sarah-martinez".to_string(),
        scenario: "cancer-diagnosis".to_string(),
        demographics: Demographics {
            first_name: "Sarah".to_string(),
            last_name: "Martinez".to_string(),
            age: 24,
            gender: "Female".to_string(),
            ethnicity: "Hispanic/Latina".to_string(),
            occupation: "Graduate Student (Biology PhD)".to_string(),
            education: "PhD candidate".to_string(),
            languages: strings(&["English", "Spanish"]),
            residence_history: "Shared apartment near campus; family immigrated from Mexico"
                .to_string(),
        },
        medical_history: MedicalHistory {
            chief_complaint: "Fatigue, frequent infections and easy bruising".to_string(),
            diagnosis: "Acute Lymphoblastic Leukemia (ALL)".to_string(),
            symptoms: strings(&[
                "Fatigue",
                "Frequent infections",
                "Easy bruising",
                "Night sweats",
            ]),
            prior_treatments: strings(&["Blood work", "Bone marrow biopsy"]),
            recommended_treatment: "Immediate induction chemotherapy".to_string(),
            prognosis: "Good with treatment (85% cure rate)".to_string(),
        },
        psychosocial: PsychosocialProfile {
            personality: "Intelligent, driven, analytical, optimistic but realistic".to_string(),
            coping_style: "Information-seeking, problem-solving, relies on family support"
                .to_string(),
            cultural_factors:
                "First-generation college student, strong family bonds, traditional gender roles"
                    .to_string(),
            support_system: "Close-knit family, supportive but scared fiance".to_string(),
            concerns: strings(&[
                "Fertility after treatment",
                "Finishing her PhD",
                "Financial burden on family",
                "Missing her wedding",
            ]),
            emotional_state: "Shocked but determined, worried about family and future plans"
                .to_string(),
        },
        beliefs: BeliefSystem {
            religious_affiliation: "Not stated".to_string(),
            health_beliefs: "Trusts science and wants to understand the mechanisms".to_string(),
            family_values: "Family sacrificed for her education; protect them from worry"
                .to_string(),
            life_philosophy: "Hard work and planning overcome obstacles".to_string(),
            views: views(&[(
                "future_planning",
                "Wants to preserve fertility and keep academic and wedding plans",
            )]),
        },
        conversation: ConversationProfile {
            communication_style:
                "Direct questions, wants scientific details, processes information quickly"
                    .to_string(),
            primary_concerns: strings(&["Treatment protocol", "Fertility", "PhD and wedding"]),
            typical_questions: strings(&[
                "What type of leukemia is this exactly?",
                "Will the treatment affect my fertility?",
                "Can I keep working on my thesis during treatment?",
                "How do I tell my parents?",
            ]),
            emotional_triggers: strings(&["Infertility", "Dying young", "Cancel the wedding"]),
            preferred_approach: "Scientific detail, honest numbers, a concrete plan".to_string(),
            opening_lines: strings(&[
                "Hi Doctor. I'm still trying to process everything you told me about the leukemia. Can you help me understand what this means?",
            ]),
            signature_replies: strings(&[
                "I need to know exactly what type of leukemia this is and what the treatment protocol involves.",
                "Will I be able to finish my PhD program? I'm supposed to defend my thesis in six months.",
                "I'm getting married in a few months. Will I be able to go through with the wedding?",
                "What about having children? Will the treatment affect my fertility?",
                "How do I tell my parents? They've sacrificed so much for my education.",
                "I want to understand the science behind this. What caused my cells to become cancerous?",
            ]),
        },
    }
}

fn robert_thompson() -> Persona {
    Persona {
        id: "robert-thompson".to_string(),
        scenario: "end-of-life".to_string(),
        demographics: Demographics {
            first_name: "Robert".to_string(),
            last_name: "Thompson".to_string(),
            age: 82,
            gender: "Male".to_string(),
            ethnicity: "Caucasian".to_string(),
            occupation: "Retired Engineer".to_string(),
            education: "Engineering degree".to_string(),
            languages: strings(&["English"]),
            residence_history: "Lives alone in the family home he built".to_string(),
        },
        medical_history: MedicalHistory {
            chief_complaint: "Severe shortness of breath after recent admission".to_string(),
            diagnosis: "End-stage heart failure, NYHA Class IV".to_string(),
            symptoms: strings(&[
                "Severe shortness of breath",
                "Fatigue",
                "Fluid retention",
                "Frequent hospitalizations",
            ]),
            prior_treatments: strings(&[
                "Multiple cardiac procedures",
                "Diabetes management",
                "Chronic kidney disease care",
            ]),
            recommended_treatment: "Goals of care discussion and advance directives".to_string(),
            prognosis: "6-12 months without intervention".to_string(),
        },
        psychosocial: PsychosocialProfile {
            personality: "Independent, analytical, stubborn, proud, practical".to_string(),
            coping_style: "Problem-solving, struggling with loss of control".to_string(),
            cultural_factors: "Traditional values, self-reliance, skeptical of prolonging suffering"
                .to_string(),
            support_system: "Three adult children who disagree about his care".to_string(),
            concerns: strings(&[
                "Prolonged suffering",
                "Losing dignity",
                "Family conflict after he is gone",
            ]),
            emotional_state: "Frustrated with declining health, missing his late wife".to_string(),
        },
        beliefs: BeliefSystem {
            religious_affiliation: "Not stated".to_string(),
            health_beliefs: "Wants the facts; machines should not replace living".to_string(),
            family_values: "Loves his children, frustrated by their disagreements".to_string(),
            life_philosophy: "Fix what you can, accept what you cannot".to_string(),
            views: views(&[(
                "death_and_dying",
                "Would rather not be kept alive on machines; misses his wife Martha",
            )]),
        },
        conversation: ConversationProfile {
            communication_style: "Direct, sometimes gruff, values honesty, dislikes being patronized"
                .to_string(),
            primary_concerns: strings(&["Independence", "Honest prognosis", "Family agreement"]),
            typical_questions: strings(&[
                "How much time are we talking about here?",
                "What are the odds any of these treatments actually work?",
                "Can I stay in my own house?",
            ]),
            emotional_triggers: strings(&[
                "Assisted living",
                "Nursing home",
                "Loss of independence",
            ]),
            preferred_approach: "Straight facts, respect his autonomy, no sugarcoating".to_string(),
            opening_lines: strings(&[
                "Doc, I appreciate you being straight with me. My kids are all wound up about my condition, but I need the facts.",
            ]),
            signature_replies: strings(&[
                "Just give it to me straight. How much time are we talking about here?",
                "My kids can't agree on anything. One wants me to fight, another says let me go in peace. What do you think?",
                "I've been fixing things my whole life, but I can't fix this heart, can I?",
                "Martha and I, we had a good run. Sometimes I wonder if it's time to join her.",
                "I don't want to be hooked up to a bunch of machines. That's not living, that's existing.",
                "What would you do if this was your father? Don't give me the doctor speech, give me the truth.",
            ]),
        },
    }
}

fn maya_patel() -> Persona {
    Persona {
        id: "maya-patel".to_string(),
        scenario: "end-of-life".to_string(),
        demographics: Demographics {
            first_name: "Maya".to_string(),
            last_name: "Patel".to_string(),
            age: 16,
            gender: "Female".to_string(),
            ethnicity: "South Asian (Indian-American)".to_string(),
            occupation: "High School Student".to_string(),
            education: "High school".to_string(),
            languages: strings(&["English"]),
            residence_history: "Lives with parents and older brother".to_string(),
        },
        medical_history: MedicalHistory {
            chief_complaint: "Recurring pneumonia and decreasing exercise tolerance".to_string(),
            diagnosis: "Cystic Fibrosis with Progressive Lung Disease".to_string(),
            symptoms: strings(&[
                "Chronic cough",
                "Recurring pneumonia",
                "Weight loss",
                "Decreased exercise tolerance",
            ]),
            prior_treatments: strings(&[
                "Lifelong CF management",
                "Multiple hospitalizations",
            ]),
            recommended_treatment: "Lung transplant evaluation and transition to adult care"
                .to_string(),
            prognosis: "Life expectancy significantly shortened without transplant".to_string(),
        },
        psychosocial: PsychosocialProfile {
            personality: "Mature beyond her years, artistic, thoughtful, sometimes defiant"
                .to_string(),
            coping_style: "Art as an outlet, close friendships".to_string(),
            cultural_factors: "Indian-American family, high academic expectations, family honor"
                .to_string(),
            support_system: "Overprotective parents, older brother who is pre-med".to_string(),
            concerns: strings(&[
                "Dying before achieving her dreams",
                "Being a burden on family",
                "Painful procedures",
            ]),
            emotional_state: "Frustrated with limitations, wants more independence".to_string(),
        },
        beliefs: BeliefSystem {
            religious_affiliation: "Not stated".to_string(),
            health_beliefs: "Wants a say in her own treatment decisions".to_string(),
            family_values: "Strong emphasis on education and family".to_string(),
            life_philosophy: "Live fully despite illness".to_string(),
            views: views(&[(
                "quality_of_life",
                "Weighs living her life now against treatments that might help later",
            )]),
        },
        conversation: ConversationProfile {
            communication_style:
                "Articulate but sometimes withdrawn, asks profound questions about life and death"
                    .to_string(),
            primary_concerns: strings(&["Transplant", "College", "Independence"]),
            typical_questions: strings(&[
                "What does a lung transplant really mean?",
                "Can I still go to art college?",
                "Can I make decisions without my parents in the room?",
            ]),
            emotional_triggers: strings(&["Too young", "Your parents decide", "Fragile"]),
            preferred_approach: "Speak to her directly, respect her autonomy, be honest".to_string(),
            opening_lines: strings(&[
                "Hi Dr. Smith. My parents are being super protective again, but I want to hear directly from you about my options.",
            ]),
            signature_replies: strings(&[
                "I want to understand what a lung transplant really means. Will I be normal afterwards?",
                "My parents treat me like I'm going to break. I know I'm sick, but I'm still a person with dreams.",
                "I want to go to art college. Is that even possible with everything I'm dealing with?",
                "Sometimes I wonder what it would feel like to breathe normally, without coughing all the time.",
                "I want to help other kids with CF. Maybe through my art, I can show them they're not alone.",
                "How do I balance living my life now versus planning for treatments that might help later?",
            ]),
        },
    }
}
