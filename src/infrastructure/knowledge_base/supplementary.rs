//! Built-in guides added alongside the visa knowledge base

use crate::domain::knowledge_base::Document;

const APPLICATION_PROCESS: &str = "General Visa Application Process:

1. Research and planning
   - Identify the visa type needed for your destination
   - Check eligibility criteria and required documents
   - Apply 3-6 months before travel

2. Gather documents
   - Valid passport (usually 6+ months validity)
   - Completed application forms and passport photos
   - Financial documents such as bank statements and income proof
   - Travel plans, accommodation proof and an employment letter

3. Submit the application
   - Fill in every form accurately
   - Pay the application fee
   - Submit at the embassy, consulate or visa center and keep the receipt

4. Interview (if required)
   - Bring original documents and copies
   - Answer questions about the purpose of your trip honestly and concisely

5. Processing and decision
   - Processing typically takes 5-30 days
   - Track the application online and answer requests for more information quickly

6. Visa issuance
   - Collect your passport and verify the visa details
   - Plan travel dates within the visa validity";

const DOCUMENT_REQUIREMENTS: &str = "Essential Documents for Most Visa Applications:

1. Passport
   - Valid for at least 6 months beyond your stay, with blank pages

2. Identification
   - Birth certificate, national ID card, marriage certificate if your name changed

3. Financial documents
   - Bank statements for 3-6 months, tax returns, salary confirmation
   - Sponsor affidavit when someone else funds the trip

4. Travel documents
   - Flight booking, hotel reservation, travel insurance, itinerary, return ticket

5. Employment and education
   - Employment letter, leave approval, diplomas, enrollment letter for students

6. Health and character
   - Medical examination, vaccination records, police clearance certificate

7. Photographs
   - Recent color passport photos, usually 2x2 inches, background per country rules

Tips:
- Provide originals plus certified copies
- Use official translations for documents not in the local language
- Keep digital copies and submit well before your travel dates";

const REFUSAL_HANDLING: &str = "How to Handle Visa Refusal:

Common reasons for refusal or rejection:
1. Insufficient financial support
2. Weak ties to your home country
3. Incomplete or inconsistent documentation
4. Previous visa violations or overstays
5. Criminal history or security concerns

Steps after a denial:
1. Request a written explanation of the refusal from the embassy or consulate
2. Review what went wrong and identify documentation gaps
3. Address each issue directly with stronger supporting documents
4. Consider an appeal if the country allows one, within the stated deadline
5. Reapply after the recommended waiting period, usually 3-6 months
6. Seek help from an immigration lawyer or consultant for complex cases

How to avoid a rejected application:
- Be completely honest and keep all information consistent
- Submit well-organized applications with only the required documents
- Prepare thoroughly instead of rushing";

/// Application process, document checklist and refusal guides
pub fn supplementary_documents() -> Vec<Document> {
    [
        ("visa_process_general", "General Visa Application Process", APPLICATION_PROCESS),
        ("document_requirements_guide", "Document Requirements Guide", DOCUMENT_REQUIREMENTS),
        ("visa_refusal_handling", "Visa Refusal Handling", REFUSAL_HANDLING),
    ]
    .into_iter()
    .map(|(id, topic, text)| {
        Document::new(id, text)
            .with_metadata("type", "guide")
            .with_metadata("topic", topic)
            .with_metadata("source", "internal")
    })
    .collect()
}
