mod scalar_decoding_tests;
