// All LLM prompt templates for the advisor module.
// Placeholders are rendered by llm_client::prompts::PromptTemplate.

use crate::llm_client::prompts::PromptTemplate;

/// Personalised energy-saving advice. Fields: user_type, appliances, concerns, location.
pub const RECOMMENDATION: PromptTemplate = PromptTemplate {
    name: "recommendation",
    system: "You are an expert energy conservation advisor. Provide practical, \
        personalized, and actionable advice to reduce energy consumption. \
        Also suggest energy-efficient appliances and relevant renewable energy options.",
    user: "User Type: {user_type}\n\
        Appliances Used: {appliances}\n\
        Energy Concerns: {concerns}\n\
        Location (optional): {location}",
};

/// Environmental and cost impact of previously generated advice. Fields: recommendations.
pub const ANALYSIS: PromptTemplate = PromptTemplate {
    name: "analysis",
    system: "You are an environmental analyst. Analyze the energy recommendations given \
        below and estimate their environmental and cost-saving impact.",
    user: "{recommendations}",
};

/// Efficient replacements for the listed appliances. Fields: appliances.
pub const APPLIANCE: PromptTemplate = PromptTemplate {
    name: "appliance",
    system: "You are an expert in energy-efficient appliances. Suggest replacements or \
        improvements for the following:",
    user: "{appliances}",
};

/// Renewable options for a location. Fields: location, user_type.
pub const RENEWABLE: PromptTemplate = PromptTemplate {
    name: "renewable",
    system: "You are a renewable energy consultant. Based on the user's location and use case, \
        recommend solar/wind/other options.",
    user: "Location: {location}\nUser Type: {user_type}",
};

/// Monthly kWh savings estimate. The model is asked for a bare number, which
/// the extractor then pulls out of whatever it actually returns.
pub const CO2_ESTIMATE: PromptTemplate = PromptTemplate {
    name: "co2-estimate",
    system: "You are a sustainability expert. Estimate how many kWh of electricity the user \
        can save per month from the following energy-saving recommendations. \
        Only output a number in kWh.",
    user: "{recommendations}",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_slots() {
        assert_eq!(
            RECOMMENDATION.slots(),
            vec!["user_type", "appliances", "concerns", "location"]
        );
        assert_eq!(ANALYSIS.slots(), vec!["recommendations"]);
        assert_eq!(APPLIANCE.slots(), vec!["appliances"]);
        assert_eq!(RENEWABLE.slots(), vec!["location", "user_type"]);
        assert_eq!(CO2_ESTIMATE.slots(), vec!["recommendations"]);
    }

    #[test]
    fn test_system_messages_have_no_slots() {
        for template in [RECOMMENDATION, ANALYSIS, APPLIANCE, RENEWABLE, CO2_ESTIMATE] {
            assert!(!template.system.contains('{'), "{}", template.name);
        }
    }

    #[test]
    fn test_recommendation_user_message_layout() {
        assert_eq!(
            RECOMMENDATION.user,
            "User Type: {user_type}\nAppliances Used: {appliances}\n\
             Energy Concerns: {concerns}\nLocation (optional): {location}"
        );
    }
}
