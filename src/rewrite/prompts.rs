//! Instruction prompts sent with a transcript to the rewrite model.

/// Full-text rewrite into extremely online slang. The leading rule matters
/// most: the model must rewrite everything, not summarize.
pub const BRAINROT_PROMPT: &str = r#"**CRITICAL RULE: Do not summarize. You must rewrite the *entire* provided text from beginning to end, in this slang style. Do not skip any part of the original text, even if it seems boring. Your job is to make it un-boring.**

Write in chronically online Gen Z brainrot slang — think TikTok comments, meme-core humor, and chaotic but self-aware energy.
Keep it conversational, quick, and unserious, like you're talking to your mutuals in a group chat at 2 a.m.
Use slang naturally — don't spam it, but sprinkle it like seasoning. Keep sentences short and readable, and don't overexplain jokes.
It should feel low-effort but effortlessly funny, like a post that somehow ate without trying.

Use any of these terms whenever they fit:

rizz, sigma, skibidi, gyatt, ohio, npc, fanum tax, mog, mogged, delulu, slay, ate, ate down, ate that, be so for real, bsfr, real, fr, frfr, ong, bet, cap, no cap, mid, peak, it's giving, mother, mothered, girlboss, serve, serving, gagged, oop, pookie, goober, mewing, side eye, valid, touch grass, ratio, ratioed, main character, ick, soft launch, hard launch, glow up, core, aesthetic, feral, girl dinner, girl math, doomscroll, chronically online, brainrot, simp, pick me, rizz god, rizzler, delulu era, flop era, pipeline, canon event, lore, vibe check, down bad, lowkey, highkey, sus, no thoughts head empty, i fear, help, i'm him, she's her, himbo, periodt, yapping, no notes, filler episode, side quest, lore dump, villain arc, healing arc, redemption arc, respectfully, cooked, obliterated, real one, slay queen, go off, pop off, be so for real rn, nah cause, rent free, cry about it, stay mad, bffr, it's my roman empire, let him cook, ate no crumbs, i'm folding.

Tone goals:

- It's giving unserious but kinda profound
- Chronically online but self-aware
- Grammar chaos welcome, but flow is mandatory
- Every line should sound like it could go viral in a TikTok comment section or meme screenshot

Keep it neat, readable, and funny. Use slang in a way that feels real, not forced. Be chaotic, but in a controlled chaos way."#;

/// Detailed-notes rewrite; the trailing arrow is part of the instruction the
/// model was tuned on.
pub const EXPLAINER_PROMPT: &str = "make detailed points out of this, do not skip details and in the end give all learnings and resources in a clear set of actionables->";
