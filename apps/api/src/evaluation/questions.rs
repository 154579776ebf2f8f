/// Labels of the open questions corrected by hand, `q1` first.
pub const MANUAL_QUESTIONS: [&str; 38] = [
    "1. Rôle principal d'un chargé d'étude ?",
    "2. Erreurs critiques à éviter ?",
    "3. Comparaison fiche technique / offre fournisseur ?",
    "4. Inclusion des accessoires ?",
    "5. Vérifications avant envoi ?",
    "6. Exemple de non-conformité ?",
    "7. Risque WhatsApp ?",
    "8. Frais supplémentaires ?",
    "9. Conformité normes (ATEX, UL, etc.) ?",
    "10. Demande incomplète ?",
    "11. Doute technique ?",
    "12. Première info à identifier ?",
    "13. Étape après l'origine ?",
    "14. Cas UK/UK/ATIS ?",
    "15. Cas UK/UE/ATIS ?",
    "16. Cas UK/UE/Eurodistech ?",
    "17. Cas USA/UE ?",
    "18. Fournisseur différent du pays d'origine ?",
    "19. Prévenir RH ?",
    "20. Horaires officiels ?",
    "21. Absence urgente ?",
    "22. Certificat médical refusé ?",
    "23. Conséquences retard ?",
    "24. Absence non justifiée ?",
    "25. Compréhension règles RH ?",
    "26. Points flous internes ?",
    "27. Plan anti-malentendu ?",
    "28. Erreur collègue ?",
    "29. Tâche secondaire ?",
    "30. Désaccord chef ?",
    "31. Perturbation concentration ?",
    "32. Respect Open Space ?",
    "33. Difficulté 2 premières semaines ?",
    "34. Compétences renforcées ?",
    "35. Produits/Demandes complexes ?",
    "36. Bonnes pratiques ?",
    "37. Conseil futur recrue ?",
    "38. Points d'amélioration ?",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_numbered_in_order() {
        for (index, label) in MANUAL_QUESTIONS.iter().enumerate() {
            assert!(label.starts_with(&format!("{}. ", index + 1)), "{label}");
        }
    }
}
